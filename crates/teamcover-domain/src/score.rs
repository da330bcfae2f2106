//! Score module - the lexicographic ordering key over teams

use crate::item::ItemId;
use std::fmt;

/// Sorted member ids of a team
///
/// Injective over distinct teams, so it breaks every remaining tie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TeamIdentity(Vec<ItemId>);

impl TeamIdentity {
    /// Build an identity from member ids in any order
    pub fn new(ids: impl IntoIterator<Item = ItemId>) -> Self {
        let mut ids: Vec<ItemId> = ids.into_iter().collect();
        ids.sort();
        Self(ids)
    }

    /// The sorted member ids
    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }
}

/// Seven-field score of a team, compared lexicographically in field order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScoreTuple {
    /// Number of opposing keys at least one member beats decisively
    pub coverage: usize,
    /// Covered keys with at least one more favorable or neutral answer
    pub fallback: usize,
    /// Covered keys with a second favorable answer
    pub favorable_redundancy: usize,
    /// Keys beaten decisively by more than one member
    pub decisive_redundancy: usize,
    /// Covered keys with at least two more favorable or neutral answers
    pub fallback_redundancy: usize,
    /// Sum of member profile scores
    pub total_score: i64,
    /// Final tie-breaker
    pub uniqueness: TeamIdentity,
}

impl ScoreTuple {
    /// The first six fields, ignoring the identity tie-breaker
    pub fn quality(&self) -> (usize, usize, usize, usize, usize, i64) {
        (
            self.coverage,
            self.fallback,
            self.favorable_redundancy,
            self.decisive_redundancy,
            self.fallback_redundancy,
            self.total_score,
        )
    }
}

impl fmt::Display for ScoreTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.coverage,
            self.fallback,
            self.favorable_redundancy,
            self.decisive_redundancy,
            self.fallback_redundancy,
            self.total_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(coverage: usize, total_score: i64, ids: &[u32]) -> ScoreTuple {
        ScoreTuple {
            coverage,
            total_score,
            uniqueness: TeamIdentity::new(ids.iter().map(|i| ItemId::new(*i))),
            ..Default::default()
        }
    }

    #[test]
    fn test_coverage_dominates() {
        assert!(tuple(5, -100, &[1]) > tuple(4, 100, &[2]));
    }

    #[test]
    fn test_identity_breaks_ties() {
        let a = tuple(3, 10, &[3, 1, 2]);
        let b = tuple(3, 10, &[1, 2, 4]);
        assert_ne!(a, b);
        assert_eq!(a.quality(), b.quality());
        assert!(a < b);
        assert_eq!(a.uniqueness.ids()[0], ItemId::new(1));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: equal tuples imply identical member identities
        #[test]
        fn test_equality_implies_same_members(
            a in prop::collection::btree_set(0u32..30, 1..6),
            b in prop::collection::btree_set(0u32..30, 1..6),
            coverage in 0usize..5,
        ) {
            let ta = ScoreTuple {
                coverage,
                uniqueness: TeamIdentity::new(a.iter().map(|i| ItemId::new(*i))),
                ..Default::default()
            };
            let tb = ScoreTuple {
                coverage,
                uniqueness: TeamIdentity::new(b.iter().map(|i| ItemId::new(*i))),
                ..Default::default()
            };
            prop_assert_eq!(ta == tb, a == b);
            let orderings = [ta < tb, ta > tb, ta == tb];
            prop_assert_eq!(orderings.iter().filter(|x| **x).count(), 1);
        }
    }
}
