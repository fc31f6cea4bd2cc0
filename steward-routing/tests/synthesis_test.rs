//! Tests for the rule synthesizer: majority vote, tie handling, family
//! proposals, merge semantics, and the conflict report.

use steward_core::errors::SynthesisError;
use steward_routing::synth::{ConflictResolution, ConflictSubject};
use steward_routing::table::RuleTableDocument;
use steward_routing::{synthesize, RuleTable, SampleRecord, SynthesisOptions};

fn sample(plugin_id: u64, family: &str, owner: &str) -> SampleRecord {
    SampleRecord {
        plugin_id: Some(plugin_id),
        plugin_name: Some(format!("Plugin {plugin_id}")),
        family: (!family.is_empty()).then(|| family.to_string()),
        known_owner_team: Some(owner.to_string()),
    }
}

fn options(min_family_support: usize) -> SynthesisOptions {
    SynthesisOptions {
        rule_version: "2026-08-06-r1".to_string(),
        default_owner_team: "vm-triage".to_string(),
        min_family_support,
    }
}

#[test]
fn test_majority_vote_emits_winner() {
    let samples = vec![
        sample(100, "", "team-a"),
        sample(100, "", "team-a"),
        sample(100, "", "team-a"),
        sample(100, "", "team-b"),
        sample(100, "", "team-b"),
    ];
    let outcome = synthesize(&samples, None, &options(2)).unwrap();

    let rule = outcome.table.plugin_rule(100).unwrap();
    assert_eq!(rule.owner_team, "team-a");
    assert_eq!(rule.id, "pid-100");

    let conflict = &outcome.report.conflicts[0];
    assert_eq!(conflict.resolution, ConflictResolution::Majority);
    assert_eq!(
        conflict.subject,
        ConflictSubject::PluginId { plugin_id: 100 }
    );
    assert_eq!(conflict.competing_owners[0].owner, "team-a");
    assert_eq!(conflict.competing_owners[0].count, 3);
    assert_eq!(conflict.competing_owners[1].owner, "team-b");
    assert_eq!(conflict.competing_owners[1].count, 2);
}

#[test]
fn test_tie_emits_no_rule() {
    let samples = vec![
        sample(200, "", "team-a"),
        sample(200, "", "team-a"),
        sample(200, "", "team-b"),
        sample(200, "", "team-b"),
    ];
    let outcome = synthesize(&samples, None, &options(2)).unwrap();

    assert!(outcome.table.plugin_rule(200).is_none());
    let conflict = &outcome.report.conflicts[0];
    assert_eq!(conflict.resolution, ConflictResolution::UnresolvedTie);
    assert_eq!(outcome.report.plugin_rules_derived, 0);
}

#[test]
fn test_unanimous_plugin_is_not_a_conflict() {
    let samples = vec![sample(300, "", "team-c"), sample(300, "", "team-c")];
    let outcome = synthesize(&samples, None, &options(5)).unwrap();
    assert_eq!(
        outcome.table.plugin_rule(300).map(|r| r.owner_team.as_str()),
        Some("team-c")
    );
    assert!(outcome
        .report
        .conflicts
        .iter()
        .all(|c| !matches!(c.subject, ConflictSubject::PluginId { plugin_id: 300 })));
}

#[test]
fn test_family_proposal_suppressed_below_support() {
    let samples = vec![
        sample(1, "Databases", "dba"),
        sample(2, "Databases", "dba"),
        sample(3, "Databases", "dba"),
    ];
    let outcome = synthesize(&samples, None, &options(5)).unwrap();

    assert!(outcome.table.family_fallback("Databases").is_none());
    let conflict = outcome
        .report
        .conflicts
        .iter()
        .find(|c| {
            matches!(&c.subject, ConflictSubject::Family { family } if family == "Databases")
        })
        .unwrap();
    assert_eq!(
        conflict.resolution,
        ConflictResolution::SuppressedLowSupport
    );
    assert_eq!(outcome.report.family_rules_derived, 0);
}

#[test]
fn test_family_proposal_requires_unanimity() {
    let samples = vec![
        sample(1, "Databases", "dba"),
        sample(2, "Databases", "dba"),
        sample(3, "Databases", "dba"),
        sample(4, "Databases", "infra"),
    ];
    let outcome = synthesize(&samples, None, &options(2)).unwrap();

    // 3-1 majority is not enough at the family level
    assert!(outcome.table.family_fallback("Databases").is_none());
    let conflict = outcome
        .report
        .conflicts
        .iter()
        .find(|c| {
            matches!(&c.subject, ConflictSubject::Family { family } if family == "Databases")
        })
        .unwrap();
    assert_eq!(conflict.resolution, ConflictResolution::UnresolvedTie);
}

#[test]
fn test_family_proposal_emitted_with_support_and_unanimity() {
    let samples = vec![
        sample(1, "Red Hat Local Security Checks", "linux-platform"),
        sample(2, "Red Hat Local Security Checks", "linux-platform"),
        sample(3, "Red Hat Local Security Checks", "linux-platform"),
    ];
    let outcome = synthesize(&samples, None, &options(3)).unwrap();

    let rule = outcome
        .table
        .family_fallback("Red Hat Local Security Checks")
        .unwrap();
    assert_eq!(rule.owner_team, "linux-platform");
    assert_eq!(rule.id, "fam-red-hat-local-security-checks");
    assert_eq!(outcome.report.family_rules_derived, 1);
}

#[test]
fn test_invalid_samples_skipped_and_counted() {
    let samples = vec![
        SampleRecord {
            plugin_id: None,
            plugin_name: Some("no id".to_string()),
            family: None,
            known_owner_team: Some("team-a".to_string()),
        },
        SampleRecord {
            plugin_id: Some(400),
            plugin_name: None,
            family: None,
            known_owner_team: None,
        },
        SampleRecord {
            plugin_id: Some(400),
            plugin_name: None,
            family: None,
            known_owner_team: Some("   ".to_string()),
        },
        sample(400, "", "team-a"),
    ];
    let outcome = synthesize(&samples, None, &options(2)).unwrap();
    assert_eq!(outcome.report.skipped_samples, 3);
    assert!(outcome.table.plugin_rule(400).is_some());
}

fn prior_table() -> RuleTable {
    RuleTableDocument::from_yaml_str(
        r#"
rule_version: "2026-07-01"
default_owner_team: vm-triage
rules:
  - id: pid-100
    plugin_id: 100
    owner_team: team-a
  - id: rule-100-dmz
    plugin_id: 100
    asset_tag: dmz
    owner_team: edge-security
family_fallbacks:
  - id: fam-windows
    family: "Windows"
    owner_team: windows-platform
"#,
    )
    .unwrap()
    .freeze()
    .unwrap()
}

#[test]
fn test_merge_never_overwrites_prior_silently() {
    let samples = vec![
        sample(100, "", "team-z"),
        sample(100, "", "team-z"),
        sample(100, "", "team-z"),
    ];
    let outcome = synthesize(&samples, Some(&prior_table()), &options(2)).unwrap();

    // Prior owner stays in force
    assert_eq!(
        outcome.table.plugin_rule(100).map(|r| r.owner_team.as_str()),
        Some("team-a")
    );
    let conflict = outcome
        .report
        .conflicts
        .iter()
        .find(|c| matches!(c.subject, ConflictSubject::PluginId { plugin_id: 100 }))
        .unwrap();
    assert_eq!(conflict.resolution, ConflictResolution::PriorRetained);
    assert_eq!(conflict.competing_owners[0].owner, "team-a");
    assert_eq!(conflict.competing_owners[1].owner, "team-z");
    assert_eq!(conflict.competing_owners[1].count, 3);
}

#[test]
fn test_merge_adds_unseen_plugins_and_carries_prior_rules() {
    let samples = vec![sample(500, "", "team-new")];
    let outcome = synthesize(&samples, Some(&prior_table()), &options(2)).unwrap();

    assert_eq!(
        outcome.table.plugin_rule(500).map(|r| r.owner_team.as_str()),
        Some("team-new")
    );
    // Prior overrides and family fallbacks carry over
    assert!(outcome.table.override_for(100, "dmz").is_some());
    assert!(outcome.table.family_fallback("Windows").is_some());
    // Agreement with prior is not a conflict
    assert!(outcome.report.conflicts.is_empty());
}

#[test]
fn test_merge_agreeing_derivation_is_silent() {
    let samples = vec![sample(100, "", "team-a"), sample(100, "", "team-a")];
    let outcome = synthesize(&samples, Some(&prior_table()), &options(2)).unwrap();
    assert!(outcome.report.conflicts.is_empty());
    assert_eq!(
        outcome.table.plugin_rule(100).map(|r| r.id.as_str()),
        Some("pid-100")
    );
}

#[test]
fn test_rule_version_is_caller_supplied() {
    let outcome = synthesize(&[sample(1, "", "t")], Some(&prior_table()), &options(2)).unwrap();
    assert_eq!(outcome.table.rule_version(), "2026-08-06-r1");
}

#[test]
fn test_blank_rule_version_is_an_error() {
    let mut opts = options(2);
    opts.rule_version = "  ".to_string();
    let err = synthesize(&[], None, &opts).unwrap_err();
    assert_eq!(err, SynthesisError::BlankRuleVersion);
}

#[test]
fn test_conflict_report_serialization_shape() {
    let samples = vec![
        sample(200, "", "team-a"),
        sample(200, "", "team-b"),
    ];
    let outcome = synthesize(&samples, None, &options(2)).unwrap();
    let value = serde_json::to_value(&outcome.report.conflicts).unwrap();
    assert_eq!(value[0]["plugin_id"], 200);
    assert_eq!(value[0]["resolution"], "unresolved-tie");
    assert_eq!(value[0]["competing_owners"][0]["count"], 1);
}
