//! Core data model: canonical findings, rules, decisions, enriched output.

pub mod decision;
pub mod enriched;
pub mod finding;
pub mod rules;

pub use decision::{Confidence, MatchType, OwnershipDecision};
pub use enriched::{EnrichedRecord, GovernanceBlock, OwnershipBlock};
pub use finding::{
    Anomaly, AssetIdentity, Evidence, Lifecycle, NormalizedFinding, OpsContext, VulnDetail,
};
pub use rules::{FamilyRule, OverrideRule, PluginRule, Rule, RuleTable};
