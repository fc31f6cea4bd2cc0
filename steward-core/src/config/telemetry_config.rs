//! Telemetry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for tracing output.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Emit tracing output. Default: true.
    pub enabled: Option<bool>,
    /// Filter directive, same syntax as `RUST_LOG`. Default: "info".
    pub filter: Option<String>,
}

impl TelemetryConfig {
    /// Returns whether telemetry is enabled, defaulting to true.
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Returns the effective filter directive, defaulting to "info".
    pub fn effective_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or("info")
    }
}
