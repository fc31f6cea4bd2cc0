//! Deterministic routing: fixed precedence, first match wins.

use crate::model::decision::{MatchType, OwnershipDecision};
use crate::model::finding::NormalizedFinding;
use crate::model::rules::RuleTable;

/// Route one normalized finding against a frozen rule table.
///
/// Total: absence of any match resolves to the table's default owner.
/// `asset_tag` is supplied by the caller — the engine consumes a tag value
/// if given and never derives one from asset fields.
///
/// Precedence, evaluated in order, first match wins:
/// 1. Override on (plugin_id, asset_tag)
/// 2. Plugin rule on plugin_id
/// 3. Family fallback on the exact family string
/// 4. Default owner team
pub fn route(
    finding: &NormalizedFinding,
    asset_tag: Option<&str>,
    table: &RuleTable,
) -> OwnershipDecision {
    let plugin_id = finding.vuln.plugin_id;

    if let Some(tag) = asset_tag {
        if let Some(rule) = table.override_for(plugin_id, tag) {
            return OwnershipDecision::matched(
                rule.owner_team.clone(),
                MatchType::Override,
                rule.id.clone(),
                table.rule_version(),
            );
        }
    }

    if let Some(rule) = table.plugin_rule(plugin_id) {
        return OwnershipDecision::matched(
            rule.owner_team.clone(),
            MatchType::PluginId,
            rule.id.clone(),
            table.rule_version(),
        );
    }

    if let Some(family) = finding.vuln.family.as_deref() {
        if let Some(rule) = table.family_fallback(family) {
            return OwnershipDecision::matched(
                rule.owner_team.clone(),
                MatchType::Family,
                rule.id.clone(),
                table.rule_version(),
            );
        }
    }

    OwnershipDecision::default_owner(table.default_owner_team().to_string(), table.rule_version())
}
