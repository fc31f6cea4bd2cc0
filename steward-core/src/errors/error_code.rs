//! Stable error codes for machine-readable reporting.

/// Maps every Steward error to a stable code string.
pub trait StewardErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const SCHEMA_ERROR: &str = "STW-SCHEMA";
pub const CONFIG_ERROR: &str = "STW-CONFIG";
pub const SYNTHESIS_ERROR: &str = "STW-SYNTH";
