//! Canonical finding schema.
//!
//! A raw export record is normalized exactly once into this fixed shape
//! and is immutable afterward. `plugin_id` is the only key ever used for
//! routing decisions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One vulnerability observation on one asset, in canonical shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFinding {
    /// Exporter-assigned finding identifier. Mandatory.
    pub finding_id: String,
    pub asset: AssetIdentity,
    pub vuln: VulnDetail,
    pub lifecycle: Lifecycle,
    pub evidence: Evidence,
    pub ops: OpsContext,
    /// Structural inconsistencies observed during normalization.
    /// Advisory only: never blocks normalization, never affects routing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<Anomaly>,
}

/// Asset identity fields. Everything here is optional; absent raw fields
/// stay `None` and are never inferred from neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetIdentity {
    pub uuid: Option<String>,
    pub hostname: Option<String>,
    pub fqdn: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub os: Option<String>,
    pub device_type: Option<String>,
}

/// Vulnerability detail. `plugin_id` is the mandatory primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnDetail {
    pub plugin_id: u64,
    pub plugin_name: Option<String>,
    pub family: Option<String>,
    /// Deduplicated CVE ids, order-stable: `plugin.cve[]` entries first,
    /// then CVE-typed xrefs, later case-insensitive duplicates dropped.
    pub cves: SmallVec<[String; 4]>,
    /// Non-CVE vendor references (xrefs and advisory links).
    pub vendor_refs: Vec<String>,
    pub description: Option<String>,
    pub solution: Option<String>,
}

/// Lifecycle dates and state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lifecycle {
    pub state: Option<String>,
    pub first_found: Option<NaiveDate>,
    pub last_found: Option<NaiveDate>,
    pub resurfaced_date: Option<NaiveDate>,
    /// Whole days between `first_found` and the evaluation timestamp the
    /// caller injected. `None` when `first_found` is absent or in the
    /// future.
    pub age_days: Option<i64>,
}

/// Detection evidence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evidence {
    pub output: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<String>,
    pub service: Option<String>,
}

/// Operational context of the scan that produced the finding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpsContext {
    pub source: Option<String>,
    pub scan_uuid: Option<String>,
    pub network_id: Option<String>,
}

/// One detected inconsistency in the raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Stable anomaly code, e.g. `local-plugin-with-port`.
    pub code: String,
    /// Human-readable detail naming the offending values.
    pub detail: String,
}

impl Anomaly {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }
}
