//! Joypad (spec §4.7 supplement, §6). Grounded on
//! `original_source/lib/gamepad.c`'s `gamepad_get_output`.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub start: bool,
    pub select: bool,
}

#[derive(Debug, Default, Clone)]
pub struct Joypad {
    pub buttons: ButtonState,
    select_bits: u8,
    last_output: u8,
}

impl Joypad {
    pub fn new() -> Self {
        Joypad {
            buttons: ButtonState::default(),
            select_bits: 0x30,
            last_output: 0xFF,
        }
    }

    /// Write to the select bits of 0xFF00 (bits 4,5 — the rest is read-only).
    pub fn write_select(&mut self, val: u8) {
        self.select_bits = val & 0x30;
    }

    /// Compute the current register value (host state sampled live, as
    /// spec §5/§9 describe) and report whether this read produced a
    /// falling edge on any active-low output line, which raises Joypad.
    pub fn read(&mut self) -> (u8, bool) {
        let mut out = self.select_bits | 0x0F;

        let button_sel = self.select_bits & 0x20 == 0;
        let dir_sel = self.select_bits & 0x10 == 0;

        if button_sel {
            if self.buttons.a {
                out &= !(1 << 0);
            }
            if self.buttons.b {
                out &= !(1 << 1);
            }
            if self.buttons.select {
                out &= !(1 << 2);
            }
            if self.buttons.start {
                out &= !(1 << 3);
            }
        }
        if dir_sel {
            if self.buttons.right {
                out &= !(1 << 0);
            }
            if self.buttons.left {
                out &= !(1 << 1);
            }
            if self.buttons.up {
                out &= !(1 << 2);
            }
            if self.buttons.down {
                out &= !(1 << 3);
            }
        }

        let falling_edge = (self.last_output & !out & 0x0F) != 0;
        self.last_output = out;
        (out | 0xC0, falling_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressing_a_pulls_bit0_low_when_buttons_selected() {
        let mut jp = Joypad::new();
        jp.write_select(0x10); // select buttons (bit5=0), dirs deselected
        jp.buttons.a = true;
        let (val, _) = jp.read();
        assert_eq!(val & 0x01, 0);
    }

    #[test]
    fn falling_edge_detected_on_new_press() {
        let mut jp = Joypad::new();
        jp.write_select(0x10);
        let (_, edge1) = jp.read();
        assert!(!edge1);
        jp.buttons.start = true;
        let (_, edge2) = jp.read();
        assert!(edge2);
    }
}
