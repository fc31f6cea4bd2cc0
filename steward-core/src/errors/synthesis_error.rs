//! Synthesis errors.
//!
//! Label disagreements are not errors — they are surfaced in the
//! synthesizer's conflict report. These variants cover structural misuse
//! of the synthesis entry point only.

use super::error_code::{self, StewardErrorCode};

/// Errors raised when the synthesizer is invoked with unusable options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("rule_version must be a non-blank caller-supplied token")]
    BlankRuleVersion,

    #[error("default_owner_team must be non-blank")]
    BlankDefaultOwner,
}

impl StewardErrorCode for SynthesisError {
    fn error_code(&self) -> &'static str {
        error_code::SYNTHESIS_ERROR
    }
}
