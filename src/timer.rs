//! DIV/TIMA timer (spec §4.5). Grounded on `original_source/lib/timer.c`,
//! with the canonical falling-edge-detector behavior kept and the known
//! off-by-one in the source's overflow check (it compares against 0xFF
//! *after* incrementing, one tick early) corrected per spec §4.5's
//! documented "wrap 0xFF→0x00" hardware behavior.

use crate::interrupts::InterruptController;

const TAC_BIT_FOR_SOURCE: [u8; 4] = [9, 3, 5, 7];

#[derive(Debug, Default, Clone)]
pub struct Timer {
    pub div: u16,
    pub tima: u8,
    pub tma: u8,
    pub tac: u8,
    // TIMA overflowed last machine cycle; the TMA reload + interrupt is
    // delayed by one cycle (spec §4.5).
    reload_pending: bool,
}

impl Timer {
    pub fn reset(&mut self) {
        *self = Timer::default();
        self.div = 0xAB00;
    }

    fn selected_bit_high(&self) -> bool {
        let bit = TAC_BIT_FOR_SOURCE[(self.tac & 0b11) as usize];
        (self.div & (1 << bit)) != 0
    }

    /// Advance by one machine cycle (4 system ticks).
    pub fn tick(&mut self, ic: &mut InterruptController) {
        if self.reload_pending {
            self.tima = self.tma;
            ic.request(crate::interrupts::TIMER);
            self.reload_pending = false;
        }

        let was_high = self.selected_bit_high();
        self.div = self.div.wrapping_add(4);
        let now_high = self.selected_bit_high();

        let enabled = (self.tac & 0b100) != 0;
        if enabled && was_high && !now_high {
            self.step_tima();
        }
    }

    fn step_tima(&mut self) {
        let (result, overflow) = self.tima.overflowing_add(1);
        self.tima = result;
        if overflow {
            self.reload_pending = true;
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.div >> 8) as u8,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF04 => {
                // Resetting DIV can itself trigger a TIMA tick if the
                // monitored bit was high (falling-edge on the reset).
                let was_high = self.selected_bit_high();
                self.div = 0;
                let enabled = (self.tac & 0b100) != 0;
                if enabled && was_high {
                    self.step_tima();
                }
            }
            0xFF05 => self.tima = val,
            0xFF06 => self.tma = val,
            0xFF07 => self.tac = val & 0x07,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_reset_on_high_bit_ticks_tima() {
        let mut t = Timer::default();
        t.tac = 0b101; // enable, source = bit 3
        t.div = 1 << 3;
        let mut ic = InterruptController::default();
        t.write(0xFF04, 0);
        assert_eq!(t.tima, 1);
        let _ = ic;
    }

    #[test]
    fn tima_overflow_reloads_after_one_cycle_and_requests_interrupt() {
        let mut t = Timer::default();
        t.tac = 0b101;
        t.tma = 0xAB;
        t.tima = 0xFF;
        t.div = 0; // bit 3 low
        let mut ic = InterruptController::default();
        // Drive div's bit 3 high then low to clock TIMA once.
        t.div = 12; // bit 3 set; +4 -> 16, bit 3 clears (falling edge)
        t.tick(&mut ic);
        assert_eq!(t.tima, 0);
        assert_eq!(ic.pending(), 0); // interrupt delayed one more cycle
        t.tick(&mut ic);
        assert_eq!(t.tima, t.tma);
        assert_eq!(ic.pending() & crate::interrupts::TIMER, crate::interrupts::TIMER);
    }
}
