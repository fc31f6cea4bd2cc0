//! Rule-table document parsing and validation.
//!
//! The configuration source is a structured document (YAML in the field);
//! reading it from disk or an API is the caller's concern — the engine
//! consumes the parsed structure. Validation is all-or-nothing: a document
//! that violates any constraint yields a `ConfigError` and no table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use steward_core::errors::ConfigError;
use steward_core::types::collections::{FxHashMap, FxHashSet};

use crate::model::rules::{FamilyRule, OverrideRule, PluginRule, RuleTable};

/// On-disk shape of the routing-rules document.
///
/// Rule entries carry no text-match fields by construction: an entry keyed
/// on plugin name, description, or output fails to parse, and the legacy
/// `keyword_rules` section is rejected by name during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTableDocument {
    pub rule_version: String,
    pub rules: Vec<RuleEntry>,
    pub family_fallbacks: Vec<FamilyFallbackEntry>,
    pub default_owner_team: String,
    /// Legacy text-matching section, kept in the schema only so it can be
    /// refused with a named error instead of an opaque parse failure.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyword_rules: Vec<Value>,
}

/// One plugin rule, or an override when `asset_tag` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub id: String,
    pub plugin_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<String>,
    pub owner_team: String,
}

/// One family fallback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyFallbackEntry {
    pub id: String,
    pub family: String,
    pub owner_team: String,
}

impl RuleTableDocument {
    /// Parse from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: "<yaml>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            path: "<json>".to_string(),
            message: e.to_string(),
        })
    }

    /// Convert from an already-parsed value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::ParseError {
            path: "<value>".to_string(),
            message: e.to_string(),
        })
    }

    /// Deterministic document form of a table, sorted for stable output.
    pub fn from_table(table: &RuleTable) -> Self {
        let mut rules: Vec<RuleEntry> = table
            .plugin_rules()
            .map(|r| RuleEntry {
                id: r.id.clone(),
                plugin_id: r.plugin_id,
                asset_tag: None,
                owner_team: r.owner_team.clone(),
            })
            .chain(table.overrides().map(|r| RuleEntry {
                id: r.id.clone(),
                plugin_id: r.plugin_id,
                asset_tag: Some(r.asset_tag.clone()),
                owner_team: r.owner_team.clone(),
            }))
            .collect();
        rules.sort_by(|a, b| {
            (a.plugin_id, &a.asset_tag).cmp(&(b.plugin_id, &b.asset_tag))
        });

        let mut family_fallbacks: Vec<FamilyFallbackEntry> = table
            .family_fallbacks()
            .map(|r| FamilyFallbackEntry {
                id: r.id.clone(),
                family: r.family.clone(),
                owner_team: r.owner_team.clone(),
            })
            .collect();
        family_fallbacks.sort_by(|a, b| a.family.cmp(&b.family));

        Self {
            rule_version: table.rule_version().to_string(),
            rules,
            family_fallbacks,
            default_owner_team: table.default_owner_team().to_string(),
            keyword_rules: Vec::new(),
        }
    }

    /// Validate and freeze into an immutable `RuleTable`.
    pub fn freeze(self) -> Result<RuleTable, ConfigError> {
        if self.rule_version.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "rule_version".to_string(),
            });
        }
        if self.default_owner_team.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "default_owner_team".to_string(),
            });
        }
        if !self.keyword_rules.is_empty() {
            return Err(ConfigError::ForbiddenMatchField {
                field: "keyword_rules".to_string(),
            });
        }

        let mut overrides: FxHashMap<(u64, String), OverrideRule> = FxHashMap::default();
        let mut plugins: FxHashMap<u64, PluginRule> = FxHashMap::default();
        let mut families: FxHashMap<String, FamilyRule> = FxHashMap::default();
        let mut ids: FxHashSet<String> = FxHashSet::default();

        for entry in &self.rules {
            check_rule_fields(&entry.id, &entry.owner_team, &mut ids)?;
            match &entry.asset_tag {
                Some(tag) => {
                    if tag.trim().is_empty() {
                        return Err(ConfigError::BlankRuleField {
                            rule_id: entry.id.clone(),
                            field: "asset_tag".to_string(),
                        });
                    }
                    let key = (entry.plugin_id, tag.clone());
                    if overrides.contains_key(&key) {
                        return Err(ConfigError::DuplicateOverrideRule {
                            plugin_id: entry.plugin_id,
                            asset_tag: tag.clone(),
                        });
                    }
                    overrides.insert(
                        key,
                        OverrideRule {
                            id: entry.id.clone(),
                            plugin_id: entry.plugin_id,
                            asset_tag: tag.clone(),
                            owner_team: entry.owner_team.clone(),
                        },
                    );
                }
                None => {
                    if plugins.contains_key(&entry.plugin_id) {
                        return Err(ConfigError::DuplicatePluginRule {
                            plugin_id: entry.plugin_id,
                        });
                    }
                    plugins.insert(
                        entry.plugin_id,
                        PluginRule {
                            id: entry.id.clone(),
                            plugin_id: entry.plugin_id,
                            owner_team: entry.owner_team.clone(),
                        },
                    );
                }
            }
        }

        for entry in &self.family_fallbacks {
            check_rule_fields(&entry.id, &entry.owner_team, &mut ids)?;
            if entry.family.is_empty() {
                return Err(ConfigError::BlankRuleField {
                    rule_id: entry.id.clone(),
                    field: "family".to_string(),
                });
            }
            if families.contains_key(&entry.family) {
                return Err(ConfigError::DuplicateFamilyRule {
                    family: entry.family.clone(),
                });
            }
            families.insert(
                entry.family.clone(),
                FamilyRule {
                    id: entry.id.clone(),
                    family: entry.family.clone(),
                    owner_team: entry.owner_team.clone(),
                },
            );
        }

        tracing::info!(
            rule_version = %self.rule_version,
            overrides = overrides.len(),
            plugin_rules = plugins.len(),
            family_fallbacks = families.len(),
            "routing table frozen"
        );

        Ok(RuleTable::from_parts(
            self.rule_version,
            self.default_owner_team,
            overrides,
            plugins,
            families,
        ))
    }
}

fn check_rule_fields(
    id: &str,
    owner_team: &str,
    ids: &mut FxHashSet<String>,
) -> Result<(), ConfigError> {
    if id.trim().is_empty() {
        return Err(ConfigError::BlankRuleField {
            rule_id: id.to_string(),
            field: "id".to_string(),
        });
    }
    if owner_team.trim().is_empty() {
        return Err(ConfigError::BlankRuleField {
            rule_id: id.to_string(),
            field: "owner_team".to_string(),
        });
    }
    if !ids.insert(id.to_string()) {
        return Err(ConfigError::ValidationFailed {
            field: "rules.id".to_string(),
            message: format!("rule id {id:?} appears more than once"),
        });
    }
    Ok(())
}
