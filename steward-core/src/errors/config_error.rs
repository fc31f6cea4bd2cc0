//! Configuration and rule-table validation errors.

use super::error_code::{self, StewardErrorCode};

/// Errors raised while loading `steward.toml` or validating a routing
/// rule table.
///
/// Any of these is fatal to the run: a table that fails validation is
/// never partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Duplicate plugin rule for plugin_id {plugin_id}")]
    DuplicatePluginRule { plugin_id: u64 },

    #[error("Duplicate override rule for plugin_id {plugin_id}, asset_tag {asset_tag:?}")]
    DuplicateOverrideRule { plugin_id: u64, asset_tag: String },

    #[error("Duplicate family fallback for family {family:?}")]
    DuplicateFamilyRule { family: String },

    #[error("Rule {rule_id:?} has a blank {field}")]
    BlankRuleField { rule_id: String, field: String },

    #[error("Rules keyed on {field} are not allowed: routing matches only plugin_id, asset_tag, and family")]
    ForbiddenMatchField { field: String },
}

impl StewardErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
