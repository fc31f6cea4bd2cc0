//! Top-level Steward configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{RoutingConfig, SynthesisConfig, TelemetryConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`STEWARD_*`)
/// 3. Project config (`steward.toml` in project root)
/// 4. User config (`~/.steward/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StewardConfig {
    pub routing: RoutingConfig,
    pub synthesis: SynthesisConfig,
    pub telemetry: TelemetryConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rules_path: Option<String>,
    pub threads: Option<usize>,
    pub min_family_support: Option<u32>,
    pub default_owner_team: Option<String>,
}

impl StewardConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are not fatal.
                        // Continue with defaults.
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("steward.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            rules_path = config.routing.rules_path.as_deref().unwrap_or("<unset>"),
            min_family_support = config.synthesis.effective_min_family_support(),
            "configuration resolved"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &StewardConfig) -> Result<(), ConfigError> {
        if let Some(threads) = config.routing.threads {
            if threads == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "routing.threads".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(support) = config.synthesis.min_family_support {
            if support == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "synthesis.min_family_support".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(ref owner) = config.synthesis.default_owner_team {
            if owner.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "synthesis.default_owner_team".to_string(),
                    message: "must be non-blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.steward/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".steward").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut StewardConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: StewardConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut StewardConfig, other: &StewardConfig) {
        // Routing
        if other.routing.rules_path.is_some() {
            base.routing.rules_path = other.routing.rules_path.clone();
        }
        if other.routing.threads.is_some() {
            base.routing.threads = other.routing.threads;
        }

        // Synthesis
        if other.synthesis.min_family_support.is_some() {
            base.synthesis.min_family_support = other.synthesis.min_family_support;
        }
        if other.synthesis.default_owner_team.is_some() {
            base.synthesis.default_owner_team = other.synthesis.default_owner_team.clone();
        }

        // Telemetry
        if other.telemetry.enabled.is_some() {
            base.telemetry.enabled = other.telemetry.enabled;
        }
        if other.telemetry.filter.is_some() {
            base.telemetry.filter = other.telemetry.filter.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `STEWARD_ROUTING_RULES_PATH`, `STEWARD_SYNTHESIS_MIN_FAMILY_SUPPORT`, etc.
    fn apply_env_overrides(config: &mut StewardConfig) {
        if let Ok(val) = std::env::var("STEWARD_ROUTING_RULES_PATH") {
            config.routing.rules_path = Some(val);
        }
        if let Ok(val) = std::env::var("STEWARD_ROUTING_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.routing.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STEWARD_SYNTHESIS_MIN_FAMILY_SUPPORT") {
            if let Ok(v) = val.parse::<u32>() {
                config.synthesis.min_family_support = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STEWARD_SYNTHESIS_DEFAULT_OWNER") {
            config.synthesis.default_owner_team = Some(val);
        }
        if let Ok(val) = std::env::var("STEWARD_TELEMETRY_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.telemetry.enabled = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut StewardConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.rules_path {
            config.routing.rules_path = Some(v.clone());
        }
        if let Some(v) = cli.threads {
            config.routing.threads = Some(v);
        }
        if let Some(v) = cli.min_family_support {
            config.synthesis.min_family_support = Some(v);
        }
        if let Some(ref v) = cli.default_owner_team {
            config.synthesis.default_owner_team = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
