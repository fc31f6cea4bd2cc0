//! Routing rules and the frozen rule table.

use serde::{Deserialize, Serialize};
use steward_core::types::collections::FxHashMap;

/// Override rule: scoped to one plugin on assets carrying a specific tag.
/// Highest precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub id: String,
    pub plugin_id: u64,
    pub asset_tag: String,
    pub owner_team: String,
}

/// Exact plugin rule: keyed on the plugin id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRule {
    pub id: String,
    pub plugin_id: u64,
    pub owner_team: String,
}

/// Family fallback rule: keyed on the exact, case-sensitive family string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRule {
    pub id: String,
    pub family: String,
    pub owner_team: String,
}

/// A routing rule.
///
/// The set of kinds is closed and must stay closed: the router evaluates
/// one kind per precedence tier, in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    Override(OverrideRule),
    Plugin(PluginRule),
    Family(FamilyRule),
}

impl Rule {
    pub fn id(&self) -> &str {
        match self {
            Self::Override(r) => &r.id,
            Self::Plugin(r) => &r.id,
            Self::Family(r) => &r.id,
        }
    }

    pub fn owner_team(&self) -> &str {
        match self {
            Self::Override(r) => &r.owner_team,
            Self::Plugin(r) => &r.owner_team,
            Self::Family(r) => &r.owner_team,
        }
    }
}

/// Immutable, versioned routing table.
///
/// Constructed only by validated document load (`table::RuleTableDocument::
/// freeze`) or by the synthesizer — both enforce key uniqueness before the
/// table exists. Held read-only for the duration of a routing run and
/// replaced wholesale on version bump, never patched rule-by-rule.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rule_version: String,
    default_owner_team: String,
    overrides: FxHashMap<(u64, String), OverrideRule>,
    plugins: FxHashMap<u64, PluginRule>,
    families: FxHashMap<String, FamilyRule>,
}

impl RuleTable {
    pub(crate) fn from_parts(
        rule_version: String,
        default_owner_team: String,
        overrides: FxHashMap<(u64, String), OverrideRule>,
        plugins: FxHashMap<u64, PluginRule>,
        families: FxHashMap<String, FamilyRule>,
    ) -> Self {
        Self {
            rule_version,
            default_owner_team,
            overrides,
            plugins,
            families,
        }
    }

    /// Opaque version token stamped onto every decision.
    pub fn rule_version(&self) -> &str {
        &self.rule_version
    }

    /// Owner used when no rule matches. Always present: a table without
    /// rules of any kind still resolves every finding.
    pub fn default_owner_team(&self) -> &str {
        &self.default_owner_team
    }

    pub fn override_for(&self, plugin_id: u64, asset_tag: &str) -> Option<&OverrideRule> {
        self.overrides.get(&(plugin_id, asset_tag.to_string()))
    }

    pub fn plugin_rule(&self, plugin_id: u64) -> Option<&PluginRule> {
        self.plugins.get(&plugin_id)
    }

    /// Exact string equality, case-sensitive, no normalization.
    pub fn family_fallback(&self, family: &str) -> Option<&FamilyRule> {
        self.families.get(family)
    }

    pub fn overrides(&self) -> impl Iterator<Item = &OverrideRule> {
        self.overrides.values()
    }

    pub fn plugin_rules(&self) -> impl Iterator<Item = &PluginRule> {
        self.plugins.values()
    }

    pub fn family_fallbacks(&self) -> impl Iterator<Item = &FamilyRule> {
        self.families.values()
    }

    /// Total rule count across all three kinds.
    pub fn rule_count(&self) -> usize {
        self.overrides.len() + self.plugins.len() + self.families.len()
    }
}
