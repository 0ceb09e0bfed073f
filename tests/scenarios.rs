//! End-to-end scenario tests exercising the public `GbCore` surface, one
//! per subsystem, plus the cross-cutting invariants that must hold at
//! every cycle boundary.

use gb_core::{CoreConfig, GbCore};

fn rom_with_program(prog: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + prog.len()].copy_from_slice(prog);
    rom[0x147] = 0x00;
    let mut x: u8 = 0;
    for &b in &rom[0x134..=0x14C] {
        x = x.wrapping_sub(b).wrapping_sub(1);
    }
    rom[0x14D] = x;
    rom
}

fn core_with_program(prog: &[u8]) -> GbCore {
    GbCore::load_rom(rom_with_program(prog), CoreConfig::default()).unwrap()
}

/// S1 — boot state.
#[test]
fn s1_boot_state_ly_zero_and_nop_advances_pc_one_machine_cycle() {
    let mut core = core_with_program(&[0x00]); // NOP
    assert_eq!(core.bus.read(0xFF44), 0);
    let pc_before = core.regs.pc;
    let cycles = core.step().unwrap();
    assert_eq!(core.regs.pc, pc_before.wrapping_add(1));
    assert_eq!(cycles, 4);
}

/// S2 analogue — serial test-ROM status channel. A real Blargg cpu_instrs
/// ROM isn't embedded; this drives the same write protocol (write SB, then
/// write 0x81 to SC) with a synthetic "01-special...Passed" payload and
/// checks the core's serial capture, matching the mechanism S2 relies on.
#[test]
fn s2_serial_protocol_captures_bytes_written_with_transfer_start_bit_set() {
    let mut core = core_with_program(&[0x00]);
    let payload = b"01-special...Passed";
    for &byte in payload {
        core.bus.write(0xFF01, byte);
        core.bus.write(0xFF02, 0x81);
    }
    let out = String::from_utf8(core.bus.serial_out.clone()).unwrap();
    assert!(out.contains("01-special"));
    assert!(out.contains("Passed"));
}

/// S3 — timer.
#[test]
fn s3_timer_overflow_reloads_tma_and_requests_interrupt_within_16_cycles() {
    let mut core = core_with_program(&[0x00]);
    core.bus.timer.tac = 0x05;
    core.bus.timer.tma = 0xFE;
    core.bus.timer.tima = 0xFE;
    core.bus.timer.div = 0;
    for _ in 0..16 {
        core.bus.timer.tick(&mut core.bus.ic);
    }
    assert_eq!(core.bus.timer.tima, 0xFE);
    assert_eq!(core.bus.ic.iflag & gb_core::interrupts::TIMER, gb_core::interrupts::TIMER);
}

/// S4 — DMA.
#[test]
fn s4_dma_copies_wram_source_into_oam_and_deactivates() {
    let mut core = core_with_program(&[0x00]);
    for i in 0..0xA0usize {
        core.bus.write(0xC000 + i as u16, (i as u8).wrapping_mul(7));
    }
    core.bus.write(0xFF46, 0xC0);
    for _ in 0..162 {
        core.step().unwrap();
    }
    for i in 0..0xA0u16 {
        assert_eq!(core.bus.ppu.oam_read(0xFE00 + i), core.bus.read(0xC000 + i));
    }
    assert!(!core.bus.dma.active);
}

/// S5 — PPU frame.
#[test]
fn s5_first_scanline_renders_checkerboard_tile_pattern() {
    let mut core = core_with_program(&[0x00]);
    core.bus.ppu.write_lcdc(0x91);
    core.bus.ppu.bgp = 0xE4;
    for tile_row in 0..8usize {
        let lo = if tile_row % 2 == 0 { 0x55 } else { 0xAA };
        let hi = if tile_row % 2 == 0 { 0xAA } else { 0x55 };
        core.bus.write(0x8000 + (tile_row * 2) as u16, lo);
        core.bus.write(0x8000 + (tile_row * 2) as u16 + 1, hi);
    }
    for i in 0..1024u16 {
        core.bus.write(0x9800 + i, 0);
    }
    let start_frame = core.bus.ppu.frame_count;
    while core.bus.ppu.frame_count == start_frame {
        core.step().unwrap();
    }
    let row0 = &core.bus.ppu.framebuffer[0..160];
    // BGP=0xE4 is the identity palette (shade == color index). The
    // checkerboard tile (lo=0x55, hi=0xAA / lo=0xAA, hi=0x55) only ever
    // produces color indices 1 and 2, never 0 or 3.
    assert!(row0.iter().all(|&p| p == 1 || p == 2), "only two BGP-distinct shades expected");
    assert_ne!(row0[0], row0[1], "checkerboard tile alternates every pixel");
}

/// S6 — APU envelope decay.
#[test]
fn s6_ch1_envelope_decays_to_zero_after_three_times_sixty_four_clocks() {
    let mut core = core_with_program(&[0x00]);
    core.bus.apu.write(0xFF12, 0xF3); // NR12: init_vol 15, dir dec, period 3
    core.bus.apu.write(0xFF14, 0x80); // NR14: trigger
    assert_eq!(core.bus.apu.nr52() & 0x01, 0x01);
    assert_eq!(core.bus.apu.ch1_envelope_volume(), 15);

    // Drive the frame sequencer's 512 Hz clock directly by toggling the
    // timer divider's bit 12 every tick, so every pair of ticks produces
    // exactly one falling edge (one frame-sequencer step). Envelope clocks
    // fire on step 7 only (1 in 8 steps, 64 Hz): 3*64*8 step advances give
    // the 3*64 envelope clocks spec §8 S6 calls for, so 2*(3*64*8) ticks.
    let mut bit12_high = false;
    for _ in 0..(2 * 3 * 64 * 8) {
        bit12_high = !bit12_high;
        let div = if bit12_high { 1u16 << 12 } else { 0 };
        core.bus.apu.tick(div, &mut core.bus.ic);
    }

    assert_eq!(core.bus.apu.ch1_envelope_volume(), 0);
    assert_eq!(
        core.bus.apu.nr52() & 0x01,
        0x01,
        "channel stays enabled after envelope bottoms out; only length disables it"
    );
}

#[test]
fn invariant_if_register_top_three_bits_always_read_as_one() {
    let core = core_with_program(&[0x00]);
    assert_eq!(core.bus.read(0xFF0F) & 0xE0, 0xE0);
}

#[test]
fn invariant_f_register_low_nibble_always_zero_across_many_alu_ops() {
    let mut core = core_with_program(&[0x3E, 0x01, 0x3C, 0x3D, 0x07, 0x0F, 0x17, 0x1F, 0x27, 0x2F]);
    for _ in 0..10 {
        core.step().unwrap();
        assert_eq!(core.regs.f & 0x0F, 0);
    }
}

#[test]
fn invariant_dma_active_blocks_cpu_visible_oam_reads() {
    let mut core = core_with_program(&[0x00]);
    core.bus.ppu.oam_write(0xFE00, 0xAB);
    core.bus.write(0xFF46, 0xC0);
    assert_eq!(core.bus.read(0xFE00), 0xFF);
}
