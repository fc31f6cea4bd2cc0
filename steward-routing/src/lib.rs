//! Steward routing engine.
//!
//! Pipeline: raw finding → normalize → route (against a frozen rule table)
//! → enrich. The synthesizer derives rule tables offline from labeled
//! samples. Every operation is a pure, deterministic transformation of its
//! inputs; reading exports, writing output, and scheduling belong to the
//! caller.

pub mod batch;
pub mod enrich;
pub mod model;
pub mod normalize;
pub mod router;
pub mod synth;
pub mod table;

pub use batch::{BatchOptions, BatchOutcome, FindingFailure};
pub use enrich::{enrich, GovernanceMeta};
pub use model::decision::{Confidence, MatchType, OwnershipDecision};
pub use model::enriched::EnrichedRecord;
pub use model::finding::{Anomaly, NormalizedFinding};
pub use model::rules::{FamilyRule, OverrideRule, PluginRule, Rule, RuleTable};
pub use normalize::normalize;
pub use router::route;
pub use synth::{
    synthesize, Conflict, ConflictResolution, SampleRecord, SynthesisOptions, SynthesisOutcome,
    SynthesisReport,
};
pub use table::RuleTableDocument;
