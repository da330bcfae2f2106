//! Profile module - per-key matchup profiles
//!
//! Opposing keys are interned to dense [`KeyId`]s in sorted key order so
//! classification sets can be stored as bit sets and compared cheaply in the
//! reducer and the search.

use crate::key::AttributeKey;
use crate::relations::Relations;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Dense index of an interned [`AttributeKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(usize);

impl KeyId {
    /// Create a KeyId from its index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A bit set over [`KeyId`]s
///
/// Equality and hashing look at members only, never at capacity.
#[derive(Clone, Default)]
pub struct KeySet {
    words: Vec<u64>,
}

impl KeySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
        }
    }

    /// Add a key
    pub fn insert(&mut self, id: KeyId) {
        let word = id.0 / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (id.0 % 64);
    }

    /// Check membership
    pub fn contains(&self, id: KeyId) -> bool {
        self.words
            .get(id.0 / 64)
            .is_some_and(|w| w & (1 << (id.0 % 64)) != 0)
    }

    /// Add every member of `other`
    pub fn union_with(&mut self, other: &KeySet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    /// Set union
    pub fn union(&self, other: &KeySet) -> KeySet {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Whether every member of `self` is in `other`
    pub fn is_subset(&self, other: &KeySet) -> bool {
        self.words.iter().enumerate().all(|(i, w)| {
            let theirs = other.words.get(i).copied().unwrap_or(0);
            w & !theirs == 0
        })
    }

    /// Whether `self` is a subset of `other` and not equal to it
    pub fn is_proper_subset(&self, other: &KeySet) -> bool {
        self.is_subset(other) && !other.is_subset(self)
    }

    /// Whether the two sets have the same members
    pub fn same_members(&self, other: &KeySet) -> bool {
        self.is_subset(other) && other.is_subset(self)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Number of members of `self` not in `other`
    pub fn count_outside(&self, other: &KeySet) -> usize {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let theirs = other.words.get(i).copied().unwrap_or(0);
                (w & !theirs).count_ones() as usize
            })
            .sum()
    }

    /// Words up to the last non-zero one
    fn significant(&self) -> &[u64] {
        let end = self
            .words
            .iter()
            .rposition(|w| *w != 0)
            .map_or(0, |last| last + 1);
        &self.words[..end]
    }

    /// Iterate members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.words.iter().enumerate().flat_map(|(i, w)| {
            (0..64)
                .filter(move |bit| w & (1u64 << bit) != 0)
                .map(move |bit| KeyId(i * 64 + bit))
        })
    }
}

impl PartialEq for KeySet {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for KeySet {}

impl Hash for KeySet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|k| k.0)).finish()
    }
}

impl FromIterator<KeyId> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyId>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Result of one direction of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Unfavorable
    Weak,
    /// Regular effectiveness
    Neutral,
    /// Favorable
    Strong,
}

impl Outcome {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Weak => "weak",
            Outcome::Neutral => "neutral",
            Outcome::Strong => "strong",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offense and defense outcome of one key against another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matchup {
    /// How the key's attacks fare against the opponent
    pub offense: Outcome,
    /// How the key holds up against the opponent's attacks
    pub defense: Outcome,
}

impl Matchup {
    /// Create a matchup
    pub fn new(offense: Outcome, defense: Outcome) -> Self {
        Self { offense, defense }
    }

    /// Integer value of the matchup, in `{-4, -3, -1, 0, 1, 3, 4}`
    pub fn value(&self) -> i32 {
        use Outcome::*;
        match (self.defense, self.offense) {
            (Weak, Weak) => -4,
            (Weak, Neutral) => -3,
            (Weak, Strong) => 0,
            (Neutral, Weak) => -1,
            (Neutral, Neutral) => 0,
            (Neutral, Strong) => 3,
            (Strong, Weak) => 0,
            (Strong, Neutral) => 1,
            (Strong, Strong) => 4,
        }
    }

    /// Search-relevant classification of the matchup
    pub fn classification(&self) -> Classification {
        use Outcome::*;
        match (self.defense, self.offense) {
            (Strong, Strong) | (Neutral, Strong) => Classification::SafeSuperStab,
            (Strong, Neutral) => Classification::ResistStab,
            _ if self.value() == 0 => Classification::Neutral,
            _ => Classification::Unfavorable,
        }
    }
}

/// Search-relevant bucket of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Hits super effectively without being hit super effectively
    SafeSuperStab,
    /// Resists every attack and hits with regular effectiveness
    ResistStab,
    /// Any zero-valued matchup
    Neutral,
    /// Any negative-valued matchup
    Unfavorable,
}

/// Full matchup profile of one distinct key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Interned id of the key
    pub id: KeyId,
    /// The key itself
    pub key: AttributeKey,
    /// Attribute-level relation sets
    pub relations: Relations,
    /// Matchup against every key, indexed by [`KeyId`]
    pub matchups: Vec<Matchup>,
    /// Sum of all matchup values
    pub score: i32,
    /// Keys this one hits super effectively without being hit back hard
    pub safe_super_stab: KeySet,
    /// Keys this one walls while hitting neutrally
    pub resist_stab: KeySet,
    /// Keys against which the matchup value is zero
    pub neutral: KeySet,
}

impl Profile {
    /// Matchup against the key with the given id
    pub fn matchup(&self, opponent: KeyId) -> Option<Matchup> {
        self.matchups.get(opponent.0).copied()
    }

    /// Union of safe-super-stab and resist-stab keys
    pub fn favorable(&self) -> KeySet {
        self.safe_super_stab.union(&self.resist_stab)
    }

    /// Average matchup value across all keys
    pub fn average(&self) -> f64 {
        if self.matchups.is_empty() {
            0.0
        } else {
            self.score as f64 / self.matchups.len() as f64
        }
    }
}

/// Immutable profiles of every distinct key, interned in sorted key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileMap {
    index: BTreeMap<AttributeKey, KeyId>,
    profiles: Vec<Profile>,
}

impl ProfileMap {
    /// Build a map from profiles whose ids are their positions
    pub fn new(profiles: Vec<Profile>) -> Self {
        let index = profiles.iter().map(|p| (p.key.clone(), p.id)).collect();
        Self { index, profiles }
    }

    /// Number of profiled keys
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no key is profiled
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Interned id of a key
    pub fn id_of(&self, key: &AttributeKey) -> Option<KeyId> {
        self.index.get(key).copied()
    }

    /// Profile of a key
    pub fn get(&self, key: &AttributeKey) -> Option<&Profile> {
        self.id_of(key).and_then(|id| self.by_id(id))
    }

    /// Profile by interned id
    pub fn by_id(&self, id: KeyId) -> Option<&Profile> {
        self.profiles.get(id.0)
    }

    /// Iterate profiles in key order
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: union is an upper bound of both operands
        #[test]
        fn test_union_contains_operands(
            a in prop::collection::vec(0usize..200, 0..20),
            b in prop::collection::vec(0usize..200, 0..20),
        ) {
            let a: KeySet = a.into_iter().map(KeyId::new).collect();
            let b: KeySet = b.into_iter().map(KeyId::new).collect();
            let u = a.union(&b);
            prop_assert!(a.is_subset(&u));
            prop_assert!(b.is_subset(&u));
            prop_assert_eq!(u.len(), a.len() + b.count_outside(&a));
        }
    }
}
