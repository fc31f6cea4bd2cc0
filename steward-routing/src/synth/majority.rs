//! Majority-vote tallies over owner labels.

use steward_core::types::collections::FxHashMap;

/// Outcome of a vote among owner labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Every sample agreed on one owner.
    Unanimous(String),
    /// One owner holds a strictly highest count.
    Majority(String),
    /// Two or more owners share the highest count.
    Tie,
}

/// Tally owner labels into (owner, count) pairs, ordered by descending
/// count then owner name. Deterministic regardless of map iteration order.
pub fn tally(owners: &[String]) -> Vec<(String, usize)> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for owner in owners {
        *counts.entry(owner).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(owner, count)| (owner.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Vote over an ordered tally.
pub fn vote(tally: &[(String, usize)]) -> VoteOutcome {
    match tally {
        [] => VoteOutcome::Tie,
        [(owner, _)] => VoteOutcome::Unanimous(owner.clone()),
        [(first, first_count), (_, second_count), ..] => {
            if first_count > second_count {
                VoteOutcome::Majority(first.clone())
            } else {
                VoteOutcome::Tie
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unanimous() {
        let t = tally(&owners(&["db-team", "db-team"]));
        assert_eq!(vote(&t), VoteOutcome::Unanimous("db-team".to_string()));
    }

    #[test]
    fn test_strict_majority() {
        let t = tally(&owners(&["a", "b", "a", "a", "b"]));
        assert_eq!(t[0], ("a".to_string(), 3));
        assert_eq!(vote(&t), VoteOutcome::Majority("a".to_string()));
    }

    #[test]
    fn test_tie_is_not_resolved() {
        let t = tally(&owners(&["a", "b", "a", "b"]));
        assert_eq!(vote(&t), VoteOutcome::Tie);
    }

    #[test]
    fn test_tally_order_is_deterministic() {
        let t = tally(&owners(&["b", "a", "b", "a"]));
        // Equal counts sort by owner name
        assert_eq!(t[0].0, "a");
        assert_eq!(t[1].0, "b");
    }
}
