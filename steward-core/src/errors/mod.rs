//! Error handling for Steward.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod schema_error;
pub mod synthesis_error;

pub use config_error::ConfigError;
pub use error_code::StewardErrorCode;
pub use schema_error::SchemaError;
pub use synthesis_error::SynthesisError;
