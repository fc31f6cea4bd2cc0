//! Configuration system for Steward.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod routing_config;
pub mod steward_config;
pub mod synthesis_config;
pub mod telemetry_config;

pub use routing_config::RoutingConfig;
pub use steward_config::{CliOverrides, StewardConfig};
pub use synthesis_config::SynthesisConfig;
pub use telemetry_config::TelemetryConfig;
