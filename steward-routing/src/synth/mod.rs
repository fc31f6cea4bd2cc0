//! Offline rule synthesis from labeled samples.
//!
//! Derives a candidate rule table by majority vote over (plugin_id →
//! known owner) groups, proposes family fallbacks only under unanimity
//! plus a support threshold, and merges into a prior table without ever
//! overwriting an existing rule silently. Runs as a single batch pass,
//! independent of any online routing run.

pub mod majority;
pub mod types;

use steward_core::errors::SynthesisError;
use steward_core::types::collections::FxHashMap;

use crate::model::rules::{FamilyRule, PluginRule, RuleTable};
use majority::VoteOutcome;
pub use types::{
    Conflict, ConflictResolution, ConflictSubject, OwnerCount, SampleRecord, SynthesisOptions,
    SynthesisOutcome, SynthesisReport,
};

/// Derive a candidate rule table from labeled samples.
///
/// When `prior` is supplied, its rules carry over; a derived owner that
/// disagrees with a prior rule is reported (`prior-retained`) and the
/// prior rule stays. The produced table carries the caller-supplied
/// `rule_version` verbatim.
pub fn synthesize(
    samples: &[SampleRecord],
    prior: Option<&RuleTable>,
    options: &SynthesisOptions,
) -> Result<SynthesisOutcome, SynthesisError> {
    if options.rule_version.trim().is_empty() {
        return Err(SynthesisError::BlankRuleVersion);
    }
    if options.default_owner_team.trim().is_empty() {
        return Err(SynthesisError::BlankDefaultOwner);
    }

    let mut report = SynthesisReport::default();

    // Group valid samples; an invalid sample is skipped and counted.
    let mut by_plugin: FxHashMap<u64, Vec<String>> = FxHashMap::default();
    let mut by_family: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for sample in samples {
        let plugin_id = sample.plugin_id;
        let owner = sample
            .known_owner_team
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty());
        let (Some(plugin_id), Some(owner)) = (plugin_id, owner) else {
            report.skipped_samples += 1;
            continue;
        };
        by_plugin
            .entry(plugin_id)
            .or_default()
            .push(owner.to_string());
        if let Some(family) = sample.family.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            by_family
                .entry(family.to_string())
                .or_default()
                .push(owner.to_string());
        }
    }

    // Plugin rules by strict majority, in plugin-id order.
    let mut derived_plugins: Vec<(PluginRule, Vec<(String, usize)>)> = Vec::new();
    let mut plugin_ids: Vec<u64> = by_plugin.keys().copied().collect();
    plugin_ids.sort_unstable();
    for plugin_id in plugin_ids {
        let tally = majority::tally(&by_plugin[&plugin_id]);
        match majority::vote(&tally) {
            VoteOutcome::Unanimous(owner) => {
                derived_plugins.push((plugin_rule(plugin_id, owner), tally));
            }
            VoteOutcome::Majority(owner) => {
                report.conflicts.push(Conflict {
                    subject: ConflictSubject::PluginId { plugin_id },
                    competing_owners: owner_counts(&tally),
                    resolution: ConflictResolution::Majority,
                });
                derived_plugins.push((plugin_rule(plugin_id, owner), tally));
            }
            VoteOutcome::Tie => {
                report.conflicts.push(Conflict {
                    subject: ConflictSubject::PluginId { plugin_id },
                    competing_owners: owner_counts(&tally),
                    resolution: ConflictResolution::UnresolvedTie,
                });
            }
        }
    }
    report.plugin_rules_derived = derived_plugins.len();

    // Family proposals: support threshold first, then unanimity. No
    // majority resolution at the family level.
    let mut derived_families: Vec<(FamilyRule, Vec<(String, usize)>)> = Vec::new();
    let mut family_names: Vec<String> = by_family.keys().cloned().collect();
    family_names.sort_unstable();
    for family in family_names {
        let owners = &by_family[&family];
        let tally = majority::tally(owners);
        if owners.len() < options.min_family_support {
            report.conflicts.push(Conflict {
                subject: ConflictSubject::Family {
                    family: family.clone(),
                },
                competing_owners: owner_counts(&tally),
                resolution: ConflictResolution::SuppressedLowSupport,
            });
            continue;
        }
        if tally.len() > 1 {
            report.conflicts.push(Conflict {
                subject: ConflictSubject::Family {
                    family: family.clone(),
                },
                competing_owners: owner_counts(&tally),
                resolution: ConflictResolution::UnresolvedTie,
            });
            continue;
        }
        let owner = tally[0].0.clone();
        derived_families.push((
            FamilyRule {
                id: format!("fam-{}", family_slug(&family)),
                family: family.clone(),
                owner_team: owner,
            },
            tally,
        ));
    }
    report.family_rules_derived = derived_families.len();

    // Merge with the prior table. Prior rules win; disagreements are
    // surfaced for explicit confirmation, never resolved here.
    let mut overrides = FxHashMap::default();
    let mut plugins: FxHashMap<u64, PluginRule> = FxHashMap::default();
    let mut families: FxHashMap<String, FamilyRule> = FxHashMap::default();

    if let Some(prior) = prior {
        for rule in prior.overrides() {
            overrides.insert((rule.plugin_id, rule.asset_tag.clone()), rule.clone());
        }
        for rule in prior.plugin_rules() {
            plugins.insert(rule.plugin_id, rule.clone());
        }
        for rule in prior.family_fallbacks() {
            families.insert(rule.family.clone(), rule.clone());
        }
    }

    for (rule, tally) in derived_plugins {
        match plugins.get(&rule.plugin_id) {
            None => {
                plugins.insert(rule.plugin_id, rule);
            }
            Some(existing) if existing.owner_team == rule.owner_team => {}
            Some(existing) => {
                report.conflicts.push(Conflict {
                    subject: ConflictSubject::PluginId {
                        plugin_id: rule.plugin_id,
                    },
                    competing_owners: merge_counts(&existing.owner_team, &rule.owner_team, &tally),
                    resolution: ConflictResolution::PriorRetained,
                });
            }
        }
    }

    for (rule, tally) in derived_families {
        match families.get(&rule.family) {
            None => {
                families.insert(rule.family.clone(), rule);
            }
            Some(existing) if existing.owner_team == rule.owner_team => {}
            Some(existing) => {
                report.conflicts.push(Conflict {
                    subject: ConflictSubject::Family {
                        family: rule.family.clone(),
                    },
                    competing_owners: merge_counts(&existing.owner_team, &rule.owner_team, &tally),
                    resolution: ConflictResolution::PriorRetained,
                });
            }
        }
    }

    tracing::info!(
        rule_version = %options.rule_version,
        plugin_rules = plugins.len(),
        family_fallbacks = families.len(),
        conflicts = report.conflicts.len(),
        skipped = report.skipped_samples,
        "synthesis complete"
    );

    let table = RuleTable::from_parts(
        options.rule_version.clone(),
        options.default_owner_team.clone(),
        overrides,
        plugins,
        families,
    );

    Ok(SynthesisOutcome { table, report })
}

fn plugin_rule(plugin_id: u64, owner_team: String) -> PluginRule {
    PluginRule {
        id: format!("pid-{plugin_id}"),
        plugin_id,
        owner_team,
    }
}

fn owner_counts(tally: &[(String, usize)]) -> Vec<OwnerCount> {
    tally
        .iter()
        .map(|(owner, count)| OwnerCount {
            owner: owner.clone(),
            count: *count,
        })
        .collect()
}

/// Competing owners for a merge conflict: the prior owner first (with
/// however many samples agreed with it), then the derived winner.
fn merge_counts(
    prior_owner: &str,
    derived_owner: &str,
    tally: &[(String, usize)],
) -> Vec<OwnerCount> {
    let count_for = |owner: &str| {
        tally
            .iter()
            .find(|(o, _)| o == owner)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    };
    vec![
        OwnerCount {
            owner: prior_owner.to_string(),
            count: count_for(prior_owner),
        },
        OwnerCount {
            owner: derived_owner.to_string(),
            count: count_for(derived_owner),
        },
    ]
}

/// Stable slug for family-rule ids: lowercase, runs of non-alphanumerics
/// collapsed to single dashes.
fn family_slug(family: &str) -> String {
    let mut slug = String::with_capacity(family.len());
    let mut last_dash = true;
    for c in family.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_slug() {
        assert_eq!(family_slug("Windows : Microsoft Bulletins"), "windows-microsoft-bulletins");
        assert_eq!(family_slug("Red Hat Local Security Checks"), "red-hat-local-security-checks");
        assert_eq!(family_slug("CGI abuses"), "cgi-abuses");
    }
}
