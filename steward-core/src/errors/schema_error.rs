//! Normalization schema errors.

use super::error_code::{self, StewardErrorCode};

/// Errors raised while normalizing one raw finding.
///
/// A schema error fails that single finding and names the offending raw
/// path; it never halts a batch. Only `plugin_id` and `finding_id` are
/// mandatory — every other absence degrades to empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Mandatory field missing: {path}")]
    MissingField { path: String },

    #[error("Mandatory field malformed at {path}: {message}")]
    MalformedField { path: String, message: String },

    #[error("Raw finding is not an object")]
    NotAnObject,
}

impl SchemaError {
    /// The raw field path this error is about, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path } | Self::MalformedField { path, .. } => Some(path),
            Self::NotAnObject => None,
        }
    }
}

impl StewardErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        error_code::SCHEMA_ERROR
    }
}
