//! System memory bus (spec §4.2): address decoding, region protection, and
//! the owning home for every peripheral subsystem.
//!
//! Single-owner layout (spec §9 Design Notes): `Bus` owns the cartridge
//! mapper, RAM arrays, and every peripheral, so `GbCore` can dispatch a
//! whole machine cycle by borrowing `bus` once rather than juggling
//! multiple aliased references the way a C emulator reaches for globals.

use crate::apu::Apu;
use crate::cart::{make_mapper, Cartridge, Mapper};
use crate::dma::Dma;
use crate::error::CoreError;
use crate::interrupts::InterruptController;
use crate::joypad::Joypad;
use crate::ppu::Ppu;
use crate::timer::Timer;

pub struct Bus {
    cart_rom: Vec<u8>,
    mapper: Box<dyn Mapper>,
    vram: [u8; 0x2000],
    wram: [u8; 0x2000],
    hram: [u8; 0x7F],

    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub dma: Dma,
    pub joypad: Joypad,
    pub ic: InterruptController,

    serial_sb: u8,
    serial_sc: u8,
    /// Bytes written to the serial port, retained for host-side log/test
    /// inspection (spec §6 "serial output as a test-ROM status channel").
    pub serial_out: Vec<u8>,
}

impl Bus {
    pub fn new(cart: Cartridge, sample_rate: u32) -> Result<Self, CoreError> {
        let mapper = make_mapper(&cart)?;
        Ok(Bus {
            cart_rom: cart.rom,
            mapper,
            vram: [0u8; 0x2000],
            wram: [0u8; 0x2000],
            hram: [0u8; 0x7F],
            ppu: Ppu::new(),
            apu: Apu::new(sample_rate),
            timer: Timer::default(),
            dma: Dma::default(),
            joypad: Joypad::new(),
            ic: InterruptController::default(),
            serial_sb: 0,
            serial_sc: 0,
            serial_out: Vec::new(),
        })
    }

    fn oam_blocked(&self) -> bool {
        use crate::ppu::Mode;
        let ppu_blocks = matches!(self.ppu.mode, Mode::OamScan | Mode::PixelTransfer);
        let dma_blocks = self.dma.active && self.dma.start_delay == 0;
        ppu_blocks || dma_blocks
    }

    fn vram_blocked(&self) -> bool {
        matches!(self.ppu.mode, crate::ppu::Mode::PixelTransfer)
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.mapper.rom_read(&self.cart_rom, addr),
            0x8000..=0x9FFF => {
                if self.vram_blocked() {
                    0xFF
                } else {
                    self.vram[(addr - 0x8000) as usize]
                }
            }
            0xA000..=0xBFFF => self.mapper.ram_read(addr),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFE00..=0xFE9F => {
                if self.oam_blocked() {
                    0xFF
                } else {
                    self.ppu.oam_read(addr)
                }
            }
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00 => self.joypad_peek(),
            0xFF01 => self.serial_sb,
            0xFF02 => self.serial_sc | 0x7E,
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.ic.read_if(),
            0xFF10..=0xFF3F => self.apu.read(addr),
            0xFF40 => self.ppu.lcdc,
            0xFF41 => self.ppu.read_stat(),
            0xFF42 => self.ppu.scy,
            0xFF43 => self.ppu.scx,
            0xFF44 => self.ppu.ly,
            0xFF45 => self.ppu.lyc,
            0xFF46 => self.dma.source_hi,
            0xFF47 => self.ppu.bgp,
            0xFF48 => self.ppu.obp0,
            0xFF49 => self.ppu.obp1,
            0xFF4A => self.ppu.wy,
            0xFF4B => self.ppu.wx,
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.ic.ie,
            _ => 0xFF,
        }
    }

    fn joypad_peek(&self) -> u8 {
        // Reading P1 must not itself raise the falling-edge interrupt; that
        // only happens through `poll_joypad` once per tick against live
        // host input (spec §4.7 supplement).
        let mut jp = self.joypad.clone();
        jp.read().0
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF => self.mapper.rom_write(addr, val),
            0x8000..=0x9FFF => {
                if !self.vram_blocked() {
                    self.vram[(addr - 0x8000) as usize] = val;
                }
            }
            0xA000..=0xBFFF => self.mapper.ram_write(addr, val),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = val,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = val,
            0xFE00..=0xFE9F => {
                if !self.oam_blocked() {
                    self.ppu.oam_write(addr, val);
                }
            }
            0xFEA0..=0xFEFF => {}
            0xFF00 => self.joypad.write_select(val),
            0xFF01 => self.serial_sb = val,
            0xFF02 => {
                self.serial_sc = val & 0x83;
                if val & 0x81 == 0x81 {
                    self.serial_out.push(self.serial_sb);
                    log::debug!("serial out: {:#04x} ({})", self.serial_sb, self.serial_sb as char);
                    self.serial_sc &= !0x80;
                }
            }
            0xFF04..=0xFF07 => self.timer.write(addr, val),
            0xFF0F => self.ic.write_if(val),
            0xFF10..=0xFF3F => self.apu.write(addr, val),
            0xFF40 => self.ppu.write_lcdc(val),
            0xFF41 => self.ppu.write_stat(val),
            0xFF42 => self.ppu.scy = val,
            0xFF43 => self.ppu.scx = val,
            0xFF44 => {} // LY is read-only
            0xFF45 => self.ppu.lyc = val,
            0xFF46 => self.dma.start(val),
            0xFF47 => self.ppu.bgp = val,
            0xFF48 => self.ppu.obp0 = val,
            0xFF49 => self.ppu.obp1 = val,
            0xFF4A => self.ppu.wy = val,
            0xFF4B => self.ppu.wx = val,
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = val,
            0xFFFF => self.ic.ie = val,
            _ => {}
        }
    }

    /// Advance every peripheral by exactly one machine cycle (4 system
    /// ticks), in the fixed order spec §9 requires: timer, PPU, APU, DMA.
    /// The timer and DMA byte-transfer operate at one event per machine
    /// cycle; the PPU dot clock and APU channel frequency timers run at
    /// the underlying 4 MHz system-tick rate, so each is stepped four
    /// times per call (spec §9: "PPU tick(s)").
    /// Returns true exactly on the tick VBlank begins.
    pub fn tick_peripherals(&mut self) -> bool {
        self.timer.tick(&mut self.ic);
        self.ppu.sync_vram(&self.vram);
        let mut entered_vblank = false;
        for _ in 0..4 {
            if self.ppu.tick(&mut self.ic) {
                entered_vblank = true;
            }
            self.apu.tick(self.timer.div, &mut self.ic);
        }
        self.tick_dma();
        self.poll_joypad();
        entered_vblank
    }

    fn tick_dma(&mut self) {
        if !self.dma.active {
            return;
        }
        if self.dma.start_delay > 0 {
            self.dma.start_delay -= 1;
            return;
        }
        let src = self.dma.source_addr();
        let byte = self.read(src);
        self.ppu.oam_write(0xFE00 + self.dma.byte as u16, byte);
        self.dma.byte += 1;
        if self.dma.byte >= 0xA0 {
            self.dma.active = false;
        }
    }

    fn poll_joypad(&mut self) {
        let (_, falling_edge) = self.joypad.read();
        if falling_edge {
            self.ic.request(crate::interrupts::JOYPAD);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bus() -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[0x147] = 0x00;
        rom[0x148] = 0;
        rom[0x149] = 0;
        let cart = Cartridge::from_bytes(rom).unwrap();
        Bus::new(cart, 48_000).unwrap()
    }

    #[test]
    fn echo_ram_mirrors_work_ram() {
        let mut bus = test_bus();
        bus.write(0xC005, 0x42);
        assert_eq!(bus.read(0xE005), 0x42);
        bus.write(0xE010, 0x99);
        assert_eq!(bus.read(0xC010), 0x99);
    }

    #[test]
    fn unusable_region_reads_back_0xff() {
        let bus = test_bus();
        assert_eq!(bus.read(0xFEA5), 0xFF);
    }

    #[test]
    fn oam_reads_0xff_while_dma_active_past_start_delay() {
        let mut bus = test_bus();
        bus.write(0xFF46, 0xC0);
        assert!(bus.oam_blocked()); // start_delay still nonzero
        bus.tick_dma();
        bus.tick_dma(); // consumes the 2-cycle start delay
        assert!(bus.oam_blocked());
        assert_eq!(bus.read(0xFE00), 0xFF);
    }

    #[test]
    fn dma_copies_160_bytes_from_source_into_oam() {
        let mut bus = test_bus();
        for i in 0..0xA0u16 {
            bus.wram[(0xC000 - 0xC000 + i as usize) % bus.wram.len()] = 0;
        }
        bus.wram[0] = 0xAB;
        bus.write(0xFF46, 0xC0); // source 0xC000, mirrors into WRAM array start
        for _ in 0..2 {
            bus.tick_dma();
        }
        for _ in 0..0xA0 {
            bus.tick_dma();
        }
        assert!(!bus.dma.active);
        assert_eq!(bus.ppu.oam_read(0xFE00), 0xAB);
    }
}
