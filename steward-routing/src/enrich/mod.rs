//! Enrichment: ownership decision + governance metadata + preserved raw.
//!
//! Pure value construction. Emitting records to a stream or file is the
//! caller's concern.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::decision::OwnershipDecision;
use crate::model::enriched::{EnrichedRecord, GovernanceBlock, OwnershipBlock};
use crate::model::finding::NormalizedFinding;

/// Governance metadata stamped onto every enriched record.
///
/// `generated_at` is injected by the caller; the writer never reads the
/// wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceMeta {
    pub engine_version: String,
    pub generated_at: DateTime<Utc>,
}

impl GovernanceMeta {
    /// Metadata carrying this crate's compiled version.
    pub fn for_engine(generated_at: DateTime<Utc>) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
        }
    }
}

/// Build one immutable enriched record. Inputs are taken by value or
/// cloned; nothing is mutated.
pub fn enrich(
    finding: NormalizedFinding,
    decision: OwnershipDecision,
    governance: &GovernanceMeta,
    raw: Value,
) -> EnrichedRecord {
    let rule_version = decision.rule_version;
    EnrichedRecord {
        finding,
        ownership: OwnershipBlock {
            owner_team: decision.owner_team,
            routing_match_type: decision.match_type,
            routing_confidence: decision.confidence,
            routing_rule_id: decision.rule_id,
            routing_rule_version: rule_version.clone(),
        },
        governance: GovernanceBlock {
            engine_version: governance.engine_version.clone(),
            routing_rule_version: rule_version,
            generated_at: governance.generated_at,
        },
        raw_finding: raw,
    }
}
