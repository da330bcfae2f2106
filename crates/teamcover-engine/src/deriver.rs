//! Profile derivation
//!
//! Builds one [`Profile`] per distinct key in the catalog. Runs in two
//! passes: attribute-level [`Relations`] per key (with normalization of
//! modifiers that change nothing), then the pairwise matchup pass over the
//! interned keys.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use teamcover_domain::{
    AttributeKey, AttributeTable, Classification, Item, KeyId, KeySet, Matchup, Outcome, Profile,
    ProfileMap, Relations,
};
use tracing::{debug, info};

/// Output of [`derive`]: normalized items and their profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// Catalog items after key normalization
    pub items: Vec<Item>,
    /// Profile of every distinct key among `items`
    pub profiles: ProfileMap,
    /// Items rewritten to their base key
    pub normalized: usize,
    /// Variants dropped because the base item already exists
    pub dropped_variants: usize,
}

/// Derive profiles for every distinct key in `items`
///
/// Deterministic: keys are interned in sorted order and the output depends
/// only on the input items and table.
pub fn derive(items: &[Item], table: &AttributeTable) -> Derivation {
    let mut relations: BTreeMap<AttributeKey, Relations> = BTreeMap::new();
    for item in items {
        relations
            .entry(item.key.clone())
            .or_insert_with(|| Relations::for_key(&item.key, table));
    }

    // Base items already present, by catalog number
    let base_present: HashSet<(u32, AttributeKey)> = items
        .iter()
        .filter(|i| !i.key.has_modifiers())
        .map(|i| (i.number, i.key.clone()))
        .collect();

    let mut normalized = 0;
    let mut dropped_variants = 0;
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if !item.key.has_modifiers() {
            kept.push(item.clone());
            continue;
        }

        let base = item.key.base();
        let modified = relations.get(&item.key).copied();
        let unmodified = *relations
            .entry(base.clone())
            .or_insert_with(|| Relations::for_key(&base, table));

        if modified != Some(unmodified) {
            kept.push(item.clone());
        } else if item.is_variant() && base_present.contains(&(item.number, base.clone())) {
            debug!(item = %item.name, "Dropping variant with no effect");
            dropped_variants += 1;
        } else {
            debug!(item = %item.name, key = %item.key, "Normalizing to base key");
            kept.push(item.rekeyed(base));
            normalized += 1;
        }
    }

    let keys: BTreeSet<AttributeKey> = kept.iter().map(|i| i.key.clone()).collect();
    let keyed: Vec<(AttributeKey, Relations)> = keys
        .into_iter()
        .map(|key| {
            let r = relations
                .get(&key)
                .copied()
                .unwrap_or_else(|| Relations::for_key(&key, table));
            (key, r)
        })
        .collect();

    let profiles = ProfileMap::new(
        keyed
            .iter()
            .enumerate()
            .map(|(index, (key, own))| build_profile(KeyId::new(index), key, own, &keyed))
            .collect(),
    );

    info!(
        items = kept.len(),
        keys = profiles.len(),
        normalized,
        dropped_variants,
        "Derived matchup profiles"
    );

    Derivation {
        items: kept,
        profiles,
        normalized,
        dropped_variants,
    }
}

/// How `attacker`'s attacks fare against `defender`
fn offense(attacker: &Relations, defender: &Relations) -> Outcome {
    if !attacker.attack.intersection(defender.vulnerable).is_empty() {
        Outcome::Strong
    } else if attacker.attack.is_subset(&defender.resists) {
        Outcome::Weak
    } else {
        Outcome::Neutral
    }
}

fn build_profile(
    id: KeyId,
    key: &AttributeKey,
    own: &Relations,
    keyed: &[(AttributeKey, Relations)],
) -> Profile {
    let capacity = keyed.len();
    let mut safe_super_stab = KeySet::with_capacity(capacity);
    let mut resist_stab = KeySet::with_capacity(capacity);
    let mut neutral = KeySet::with_capacity(capacity);
    let mut matchups = Vec::with_capacity(capacity);
    let mut score = 0;

    for (index, (_, other)) in keyed.iter().enumerate() {
        let opponent = KeyId::new(index);
        // Defense is the mirror of the opponent's offense.
        let defense = match offense(other, own) {
            Outcome::Strong => Outcome::Weak,
            Outcome::Weak => Outcome::Strong,
            Outcome::Neutral => Outcome::Neutral,
        };
        let matchup = Matchup::new(offense(own, other), defense);

        match matchup.classification() {
            Classification::SafeSuperStab => safe_super_stab.insert(opponent),
            Classification::ResistStab => resist_stab.insert(opponent),
            Classification::Neutral => neutral.insert(opponent),
            Classification::Unfavorable => {}
        }
        score += matchup.value();
        matchups.push(matchup);
    }

    Profile {
        id,
        key: key.clone(),
        relations: *own,
        matchups,
        score,
        safe_super_stab,
        resist_stab,
        neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamcover_domain::{Attribute, ItemId, Modifier};

    fn item(id: u32, number: u32, key: AttributeKey) -> Item {
        Item::new(ItemId::new(id), format!("item{}", id), number, key, 500)
    }

    fn mono(a: Attribute) -> AttributeKey {
        AttributeKey::new(a, Attribute::None)
    }

    #[test]
    fn test_cycle_profiles() {
        let items = vec![
            item(0, 1, mono(Attribute::Fire)),
            item(1, 2, mono(Attribute::Water)),
            item(2, 3, mono(Attribute::Grass)),
        ];
        let derivation = derive(&items, &AttributeTable::standard());
        let profiles = &derivation.profiles;
        assert_eq!(profiles.len(), 3);

        let fire = profiles.get(&mono(Attribute::Fire)).unwrap();
        let grass = profiles.id_of(&mono(Attribute::Grass)).unwrap();
        let water = profiles.id_of(&mono(Attribute::Water)).unwrap();

        assert_eq!(fire.matchup(grass).unwrap().value(), 4);
        assert_eq!(fire.matchup(water).unwrap().value(), -4);
        assert!(fire.safe_super_stab.contains(grass));
        assert_eq!(fire.safe_super_stab.len(), 1);
        // Fire vs fire: both resist, neither hits hard.
        let own = fire.matchup(fire.id).unwrap();
        assert_eq!(own.offense, Outcome::Weak);
        assert_eq!(own.defense, Outcome::Strong);
        assert!(fire.neutral.contains(fire.id));
        assert_eq!(fire.score, 0);
    }

    #[test]
    fn test_deterministic() {
        let items = vec![
            item(0, 1, AttributeKey::new(Attribute::Steel, Attribute::Fairy)),
            item(1, 2, mono(Attribute::Dragon)),
            item(2, 3, AttributeKey::new(Attribute::Ground, Attribute::Water)),
            item(3, 4, mono(Attribute::Electric)),
        ];
        let table = AttributeTable::standard();
        assert_eq!(derive(&items, &table), derive(&items, &table));

        let mut reversed = items.clone();
        reversed.reverse();
        assert_eq!(derive(&items, &table).profiles, derive(&reversed, &table).profiles);
    }

    #[test]
    fn test_ineffective_variant_dropped() {
        // Fire already resists fire, so an immunity to it changes no set.
        let base = mono(Attribute::Fire);
        let modified = AttributeKey::with_modifiers(
            Attribute::Fire,
            Attribute::None,
            &[Modifier::immune(Attribute::Fire)],
        );
        let items = vec![
            item(0, 38, base.clone()),
            item(1, 38, modified.clone()).with_variant("Flash Fire"),
        ];
        let derivation = derive(&items, &AttributeTable::standard());

        assert_eq!(derivation.items.len(), 1);
        assert_eq!(derivation.dropped_variants, 1);
        assert!(derivation.profiles.get(&modified).is_none());
        assert!(derivation.profiles.get(&base).is_some());
    }

    #[test]
    fn test_ineffective_sole_variant_rewritten() {
        let modified = AttributeKey::with_modifiers(
            Attribute::Fire,
            Attribute::None,
            &[Modifier::immune(Attribute::Fire)],
        );
        let items = vec![item(4, 38, modified.clone()).with_variant("Flash Fire")];
        let derivation = derive(&items, &AttributeTable::standard());

        assert_eq!(derivation.normalized, 1);
        let rewritten = &derivation.items[0];
        assert_eq!(rewritten.id, ItemId::new(4));
        assert!(!rewritten.key.has_modifiers());
        assert!(!rewritten.is_variant());
        assert!(derivation.items.iter().all(|i| i.key != modified));
    }

    #[test]
    fn test_effective_variant_kept() {
        let modified = AttributeKey::with_modifiers(
            Attribute::Electric,
            Attribute::None,
            &[Modifier::immune(Attribute::Ground)],
        );
        let items = vec![
            item(0, 1, mono(Attribute::Electric)),
            item(1, 1, modified.clone()).with_variant("Levitate"),
            item(2, 2, mono(Attribute::Ground)),
        ];
        let derivation = derive(&items, &AttributeTable::standard());
        assert_eq!(derivation.items.len(), 3);

        let ground = derivation.profiles.id_of(&mono(Attribute::Ground)).unwrap();
        let plain = derivation.profiles.get(&mono(Attribute::Electric)).unwrap();
        let levitating = derivation.profiles.get(&modified).unwrap();
        assert_eq!(plain.matchup(ground).unwrap().defense, Outcome::Weak);
        assert_eq!(levitating.matchup(ground).unwrap().defense, Outcome::Strong);
    }

    #[test]
    fn test_score_is_sum_of_values() {
        let items = vec![
            item(0, 1, AttributeKey::new(Attribute::Water, Attribute::Ground)),
            item(1, 2, mono(Attribute::Grass)),
            item(2, 3, AttributeKey::new(Attribute::Bug, Attribute::Steel)),
        ];
        let derivation = derive(&items, &AttributeTable::standard());
        for profile in derivation.profiles.iter() {
            let sum: i32 = profile.matchups.iter().map(|m| m.value()).sum();
            assert_eq!(profile.score, sum);
            assert_eq!(profile.matchups.len(), derivation.profiles.len());
        }
    }
}
