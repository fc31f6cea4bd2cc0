//! Synthesis configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the rule synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Minimum aggregate sample count for a family proposal. Default: 2.
    pub min_family_support: Option<u32>,
    /// Owner team used when no rule matches. Default: "vm-triage".
    pub default_owner_team: Option<String>,
}

impl SynthesisConfig {
    /// Returns the effective minimum family support, defaulting to 2.
    pub fn effective_min_family_support(&self) -> u32 {
        self.min_family_support.unwrap_or(2)
    }

    /// Returns the effective default owner team, defaulting to "vm-triage".
    pub fn effective_default_owner_team(&self) -> &str {
        self.default_owner_team.as_deref().unwrap_or("vm-triage")
    }
}
