//! The enriched output record.
//!
//! One self-contained record per finding: the canonical finding fields,
//! the ownership decision, governance metadata, and the preserved raw
//! record. Whether records are emitted line-delimited or as an array is
//! the caller's choice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decision::{Confidence, MatchType};
use super::finding::NormalizedFinding;

/// Ownership block of the output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipBlock {
    pub owner_team: String,
    pub routing_match_type: MatchType,
    pub routing_confidence: Confidence,
    /// Serialized as `null` when the default owner applied.
    pub routing_rule_id: Option<String>,
    pub routing_rule_version: String,
}

/// Governance block of the output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceBlock {
    pub engine_version: String,
    pub routing_rule_version: String,
    pub generated_at: DateTime<Utc>,
}

/// The unit written to output. Never read back by the engine; downstream
/// systems may replay it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub finding: NormalizedFinding,
    pub ownership: OwnershipBlock,
    pub governance: GovernanceBlock,
    /// Original exporter record, preserved verbatim for audit and replay.
    pub raw_finding: Value,
}
