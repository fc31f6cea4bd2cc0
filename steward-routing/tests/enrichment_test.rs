//! Tests for the enrichment writer and the parallel batch driver.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use steward_core::errors::SchemaError;
use steward_routing::batch::{self, BatchOptions};
use steward_routing::table::RuleTableDocument;
use steward_routing::{enrich, normalize, route, GovernanceMeta, RuleTable};

fn eval_ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 6, 9, 30, 0).unwrap()
}

fn governance() -> GovernanceMeta {
    GovernanceMeta::for_engine(eval_ts())
}

fn table() -> RuleTable {
    RuleTableDocument::from_yaml_str(
        r#"
rule_version: "2026-08-01"
default_owner_team: vm-triage
rules:
  - id: rule-156641
    plugin_id: 156641
    owner_team: collaboration-platform
  - id: rule-156641-dmz
    plugin_id: 156641
    asset_tag: dmz
    owner_team: edge-security
"#,
    )
    .unwrap()
    .freeze()
    .unwrap()
}

fn raw(finding_id: &str, plugin_id: u64) -> Value {
    json!({
        "finding_id": finding_id,
        "plugin": {"id": plugin_id, "name": "Some detection"},
        "severity": "critical",
        "undocumented_exporter_field": {"nested": [1, 2, 3]}
    })
}

#[test]
fn test_enriched_record_shape() {
    let raw = raw("f-1", 156641);
    let finding = normalize(&raw, eval_ts()).unwrap();
    let decision = route(&finding, None, &table());
    let record = enrich(finding, decision, &governance(), raw.clone());

    let value = serde_json::to_value(&record).unwrap();

    // Normalized finding fields are flattened at the top level
    assert_eq!(value["finding_id"], "f-1");
    assert_eq!(value["vuln"]["plugin_id"], 156641);

    // Ownership block, exactly as documented
    assert_eq!(
        value["ownership"],
        json!({
            "owner_team": "collaboration-platform",
            "routing_match_type": "plugin_id",
            "routing_confidence": "HIGH",
            "routing_rule_id": "rule-156641",
            "routing_rule_version": "2026-08-01"
        })
    );

    // Governance block
    assert_eq!(value["governance"]["engine_version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["governance"]["routing_rule_version"], "2026-08-01");
    assert_eq!(value["governance"]["generated_at"], "2026-08-06T09:30:00Z");

    // Raw record preserved verbatim under its own key
    assert_eq!(value["raw_finding"], raw);
}

#[test]
fn test_default_match_serializes_null_rule_id() {
    let raw = raw("f-2", 999);
    let finding = normalize(&raw, eval_ts()).unwrap();
    let decision = route(&finding, None, &table());
    let record = enrich(finding, decision, &governance(), raw);

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["ownership"]["owner_team"], "vm-triage");
    assert_eq!(value["ownership"]["routing_rule_id"], Value::Null);
    assert_eq!(value["ownership"]["routing_confidence"], "LOW");
}

#[test]
fn test_enrichment_does_not_mutate_raw() {
    let raw = raw("f-3", 156641);
    let before = raw.clone();
    let finding = normalize(&raw, eval_ts()).unwrap();
    let decision = route(&finding, None, &table());
    let _ = enrich(finding, decision, &governance(), raw.clone());
    assert_eq!(raw, before);
}

#[test]
fn test_batch_isolates_schema_failures() {
    let raws = vec![
        raw("f-0", 156641),
        json!({"finding_id": "f-1"}), // no plugin id anywhere
        raw("f-2", 424242),
    ];
    let options = BatchOptions {
        evaluated_at: eval_ts(),
        governance: governance(),
    };

    let outcome = batch::process(&raws, &table(), &options, |_| None);

    assert_eq!(outcome.record_count(), 2);
    assert_eq!(outcome.failure_count(), 1);
    assert!(!outcome.is_clean());

    // Order-stable by input index
    assert_eq!(outcome.records[0].finding.finding_id, "f-0");
    assert_eq!(outcome.records[1].finding.finding_id, "f-2");
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(
        outcome.failures[0].error,
        SchemaError::MissingField {
            path: "plugin.id".to_string()
        }
    );
}

#[test]
fn test_batch_applies_caller_supplied_tags() {
    let raws = vec![raw("f-0", 156641), raw("f-1", 156641)];
    let options = BatchOptions {
        evaluated_at: eval_ts(),
        governance: governance(),
    };

    // Tag only the first finding
    let outcome = batch::process(&raws, &table(), &options, |raw| {
        (raw["finding_id"] == "f-0").then(|| "dmz".to_string())
    });

    assert_eq!(outcome.records[0].ownership.owner_team, "edge-security");
    assert_eq!(
        outcome.records[0].ownership.routing_rule_id.as_deref(),
        Some("rule-156641-dmz")
    );
    assert_eq!(
        outcome.records[1].ownership.owner_team,
        "collaboration-platform"
    );
}

#[test]
fn test_batch_decisions_all_carry_one_table_version() {
    let raws: Vec<Value> = (0..16).map(|i| raw(&format!("f-{i}"), 156641)).collect();
    let options = BatchOptions {
        evaluated_at: eval_ts(),
        governance: governance(),
    };
    let outcome = batch::process(&raws, &table(), &options, |_| None);
    assert!(outcome
        .records
        .iter()
        .all(|r| r.ownership.routing_rule_version == "2026-08-01"));
}
