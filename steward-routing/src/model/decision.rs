//! Ownership decisions and the match-type → confidence mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which precedence tier produced a routing match.
///
/// The set is closed: the router evaluates exactly these four tiers in
/// order, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Exact (plugin_id, asset_tag) override.
    Override,
    /// Exact plugin_id rule.
    PluginId,
    /// Family fallback.
    Family,
    /// No rule matched; the table default applied.
    Default,
}

impl MatchType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::PluginId => "plugin_id",
            Self::Family => "family",
            Self::Default => "default",
        }
    }

    /// Confidence label for this tier.
    ///
    /// Pure: the same tier always maps to the same label. Confidence is
    /// never stored independently of the match type.
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::Override | Self::PluginId => Confidence::High,
            Self::Family => Confidence::Medium,
            Self::Default => Confidence::Low,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deterministic confidence label.
///
/// Describes the precedence tier that produced the match, not a
/// probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The routing engine's verdict for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipDecision {
    pub owner_team: String,
    pub match_type: MatchType,
    pub confidence: Confidence,
    /// Identifier of the matched rule; `None` when the default applied.
    pub rule_id: Option<String>,
    /// Version of the table that produced this decision, stamped verbatim.
    pub rule_version: String,
}

impl OwnershipDecision {
    /// Decision for a matched rule. Confidence is derived from the tier.
    pub fn matched(
        owner_team: String,
        match_type: MatchType,
        rule_id: String,
        rule_version: &str,
    ) -> Self {
        Self {
            owner_team,
            match_type,
            confidence: match_type.confidence(),
            rule_id: Some(rule_id),
            rule_version: rule_version.to_string(),
        }
    }

    /// Decision for a finding nothing matched: the table default.
    pub fn default_owner(owner_team: String, rule_version: &str) -> Self {
        Self {
            owner_team,
            match_type: MatchType::Default,
            confidence: MatchType::Default.confidence(),
            rule_id: None,
            rule_version: rule_version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_mapping_is_fixed() {
        assert_eq!(MatchType::Override.confidence(), Confidence::High);
        assert_eq!(MatchType::PluginId.confidence(), Confidence::High);
        assert_eq!(MatchType::Family.confidence(), Confidence::Medium);
        assert_eq!(MatchType::Default.confidence(), Confidence::Low);
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(
            serde_json::to_string(&MatchType::PluginId).unwrap(),
            "\"plugin_id\""
        );
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"HIGH\""
        );
    }
}
