//! letsplay -- runs a ROM (or a built-in synthetic one) for N frames and
//! prints a coarse ASCII preview of the final frame plus run statistics.
//! Usage: letsplay [rom_path] [frames]

use gb_core::{CoreConfig, GbCore, LCD_HEIGHT, LCD_WIDTH};

fn synthetic_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    let title = b"LETSPLAY-TEST";
    for (i, &b) in title.iter().enumerate() {
        rom[0x0134 + i] = b;
    }
    rom[0x0147] = 0x00; // ROM only
    rom[0x0148] = 0x00;
    rom[0x0149] = 0x00;

    // Jam a checkerboard into the first BG tile and point the tile map at
    // it, then enable the LCD and spin waiting for VBlank.
    let prog: &[u8] = &[
        0x3E, 0x00, 0xE0, 0x40, // LD A,0 / LDH (0x40),A  -- LCD off while we poke VRAM
        0x01, 0x00, 0x80, // LD BC, 0x8000
        0x3E, 0xAA, 0x02, 0x03, // LD A,0xAA / LD (BC),A / INC BC
        0x3E, 0x55, 0x02, 0x03, 0x3E, 0xAA, 0x02, 0x03, 0x3E, 0x55, 0x02, 0x03,
        0x01, 0x00, 0x98, // LD BC, 0x9800 (tile map)
        0x3E, 0x00, 0x02, // LD A,0 / LD (BC),A
        0x3E, 0x91, 0xE0, 0x40, // LD A,0x91 / LDH (0x40),A -- LCD on, BG on
        0x3E, 0x01, 0xE0, 0xFF, // LD A,1 / LDH (0xFF),A -- IE = VBlank
        0xFB, // EI
        0xC3, 0x1E, 0x01, // JP 0x011E (spin)
    ];
    rom[0x0100] = 0xC3;
    rom[0x0101] = 0x50;
    rom[0x0102] = 0x01; // JP 0x0150
    rom[0x0150..0x0150 + prog.len()].copy_from_slice(prog);

    let mut x: u8 = 0;
    for &b in &rom[0x134..=0x14C] {
        x = x.wrapping_sub(b).wrapping_sub(1);
    }
    rom[0x14D] = x;
    rom
}

fn frame_to_ascii(core: &GbCore) -> String {
    const SHADES: [char; 4] = ['#', '+', '.', ' '];
    let fb = &core.bus.ppu.framebuffer;
    let mut out = String::new();
    for row in 0..LCD_HEIGHT {
        for col in 0..LCD_WIDTH {
            out.push(SHADES[fb[row * LCD_WIDTH + col] as usize]);
        }
        out.push('\n');
    }
    out
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let rom_path = args.get(1).filter(|s| !s.is_empty());
    let n_frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);

    let rom = match rom_path {
        Some(path) => std::fs::read(path).unwrap_or_else(|e| {
            eprintln!("failed to read {path}: {e}");
            std::process::exit(1);
        }),
        None => synthetic_rom(),
    };

    println!("letsplay | target_frames={n_frames}");
    println!(
        "resolution {LCD_WIDTH}x{LCD_HEIGHT} | cycles/frame {}",
        gb_core::CYCLES_PER_FRAME
    );

    let mut core = match GbCore::load_rom(rom, CoreConfig::default()) {
        Ok(core) => core,
        Err(e) => {
            eprintln!("failed to load ROM: {e}");
            std::process::exit(1);
        }
    };

    for frame in 0..n_frames {
        if let Err(e) = core.run_frame() {
            eprintln!("emulator halted at frame {frame}: {e}");
            std::process::exit(1);
        }
    }

    println!("=== letsplay complete ===");
    println!(
        "frames={n_frames} vblanks={} ly={} mode={:?}",
        core.bus.ppu.frame_count, core.bus.ppu.ly, core.bus.ppu.mode
    );
    println!("final frame preview (every 4th row):");
    for (i, row) in frame_to_ascii(&core).lines().enumerate() {
        if i % 4 == 0 {
            println!("{}", &row[..row.len().min(80)]);
        }
    }
}
