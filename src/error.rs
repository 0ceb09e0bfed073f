//! Fatal error conditions for the core (see spec §7).
//!
//! Most "errors" a real Game Boy exhibits are not errors at all — blocked
//! VRAM/OAM accesses return 0xFF or are ignored, and a bad header checksum
//! is merely logged. Those stay silent in `bus`/`cart`; only conditions that
//! make the interpreter loop itself unable to continue land here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown opcode 0x{0:02X} has no table entry")]
    UnknownOpcode(u8),

    #[error("unsupported cartridge mapper (type byte 0x{0:02X})")]
    UnsupportedMapper(u8),

    #[error("invalid ROM image: {0}")]
    InvalidRom(String),
}
