//! Parallel batch driver.
//!
//! Each finding's normalization and routing is independent of every other
//! finding's, so the batch is sharded across rayon workers against a
//! read-only table. A schema failure is isolated to its finding and
//! collected alongside successful records, order-stable by input index.
//! The table is never swapped mid-batch: every finding in a run sees the
//! same version.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::Value;
use steward_core::errors::SchemaError;

use crate::enrich::{enrich, GovernanceMeta};
use crate::model::enriched::EnrichedRecord;
use crate::model::rules::RuleTable;
use crate::normalize::normalize;
use crate::router::route;

/// Caller-injected batch parameters.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Evaluation timestamp used for `age_days` on every finding.
    pub evaluated_at: DateTime<Utc>,
    pub governance: GovernanceMeta,
}

/// One failed finding: its input index plus the schema error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingFailure {
    pub index: usize,
    pub error: SchemaError,
}

/// Batch output: enriched records plus isolated failures.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<EnrichedRecord>,
    pub failures: Vec<FindingFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Normalize, route, and enrich a batch of raw findings.
///
/// `tagger` supplies the caller-derived asset tag for a raw finding
/// (`None` for untagged assets); the engine itself never derives tags.
pub fn process<F>(
    raws: &[Value],
    table: &RuleTable,
    options: &BatchOptions,
    tagger: F,
) -> BatchOutcome
where
    F: Fn(&Value) -> Option<String> + Sync,
{
    let results: Vec<Result<EnrichedRecord, SchemaError>> = raws
        .par_iter()
        .map(|raw| {
            normalize(raw, options.evaluated_at).map(|finding| {
                let tag = tagger(raw);
                let decision = route(&finding, tag.as_deref(), table);
                enrich(finding, decision, &options.governance, raw.clone())
            })
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(error) => outcome.failures.push(FindingFailure { index, error }),
        }
    }

    tracing::debug!(
        records = outcome.record_count(),
        failures = outcome.failure_count(),
        rule_version = %table.rule_version(),
        "batch routed"
    );

    outcome
}
