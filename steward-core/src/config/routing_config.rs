//! Routing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the routing subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path to the routing-rules document. No default: the caller decides
    /// where rules live.
    pub rules_path: Option<String>,
    /// Worker threads for batch routing. Default: rayon's choice.
    pub threads: Option<usize>,
}
