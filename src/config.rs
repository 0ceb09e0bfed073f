//! Construction-time knobs for a [`crate::GbCore`].

/// Host-tunable settings that do not change per-cycle behavior of the
/// hardware itself, only how the core is wired up for a given host.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Sample rate the APU mixer produces samples for (see spec §4.4).
    pub sample_rate: u32,
    /// When true, a header checksum mismatch aborts `load_rom` instead of
    /// only logging a warning. Real hardware never aborts; this exists so
    /// test harnesses can opt into strict ROM validation.
    pub strict_header_checksum: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            sample_rate: 48_000,
            strict_header_checksum: false,
        }
    }
}
