//! Synthesis inputs, outcomes, and the conflict report.

use serde::{Deserialize, Serialize};

use crate::model::rules::RuleTable;

/// One labeled sample: a finding whose owning team is already known.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleRecord {
    pub plugin_id: Option<u64>,
    /// Informational only; never used for matching.
    pub plugin_name: Option<String>,
    pub family: Option<String>,
    pub known_owner_team: Option<String>,
}

/// Caller-supplied synthesis parameters.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Version stamped onto the produced table. Caller-supplied, never
    /// auto-incremented.
    pub rule_version: String,
    /// Owner used when no rule matches.
    pub default_owner_team: String,
    /// Minimum aggregate sample count for a family proposal.
    pub min_family_support: usize,
}

/// What a conflict is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConflictSubject {
    PluginId { plugin_id: u64 },
    Family { family: String },
}

/// Owner occurrence count within a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerCount {
    pub owner: String,
    pub count: usize,
}

/// How a surfaced disagreement was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictResolution {
    /// A strictly highest count won; a rule was emitted for the winner.
    Majority,
    /// Equal highest counts (or family-level disagreement); no rule
    /// emitted rather than guessing.
    UnresolvedTie,
    /// Family support below the minimum; no proposal emitted.
    SuppressedLowSupport,
    /// Merge disagreement: the prior table's rule stays in force until
    /// the change is explicitly confirmed.
    PriorRetained,
}

/// One entry of the conflict report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(flatten)]
    pub subject: ConflictSubject,
    pub competing_owners: Vec<OwnerCount>,
    pub resolution: ConflictResolution,
}

/// Per-run synthesis report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub conflicts: Vec<Conflict>,
    /// Samples missing plugin_id or owner: skipped, but never without
    /// trace.
    pub skipped_samples: usize,
    /// Plugin rules derived from samples this run.
    pub plugin_rules_derived: usize,
    /// Family proposals derived from samples this run.
    pub family_rules_derived: usize,
}

/// Synthesizer output: a candidate table plus the conflict report.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub table: RuleTable,
    pub report: SynthesisReport,
}
