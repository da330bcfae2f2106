//! Team scoring
//!
//! Computes the [`ScoreTuple`] of an assembled team and the detailed
//! [`TeamReport`] printed for the final results. Pure functions of the team
//! and the profile map.

use teamcover_domain::{
    AttributeKey, Item, KeyId, KeySet, Matchup, Profile, ProfileMap, ScoreTuple, TeamIdentity,
};

/// Score a team
///
/// Members whose key has no profile contribute nothing except their id.
pub fn score(members: &[Item], profiles: &ProfileMap) -> ScoreTuple {
    let member_profiles: Vec<&Profile> = members
        .iter()
        .filter_map(|m| profiles.get(&m.key))
        .collect();

    let mut coverage = KeySet::with_capacity(profiles.len());
    for profile in &member_profiles {
        coverage.union_with(&profile.safe_super_stab);
    }

    let mut tuple = ScoreTuple {
        coverage: coverage.len(),
        total_score: member_profiles.iter().map(|p| p.score as i64).sum(),
        uniqueness: TeamIdentity::new(members.iter().map(|m| m.id)),
        ..Default::default()
    };

    for index in 0..profiles.len() {
        let opponent = KeyId::new(index);
        let mut ss = 0;
        let mut rs = 0;
        let mut n = 0;
        for profile in &member_profiles {
            if profile.safe_super_stab.contains(opponent) {
                ss += 1;
            } else if profile.resist_stab.contains(opponent) {
                rs += 1;
            } else if profile.neutral.contains(opponent) {
                n += 1;
            }
        }

        if ss > 0 {
            let extra = ss + rs + n - 1;
            if extra > 1 {
                tuple.fallback_redundancy += 1;
                tuple.fallback += 1;
            } else if extra > 0 {
                tuple.fallback += 1;
            }
            if ss + rs - 1 > 0 {
                tuple.favorable_redundancy += 1;
            }
        }
        if ss > 1 {
            tuple.decisive_redundancy += 1;
        }
    }

    tuple
}

/// Sum of member catalog numbers, reported next to the score
pub fn identity_sum(members: &[Item]) -> u64 {
    members.iter().map(|m| m.number as u64).sum()
}

/// Per-member line of a [`TeamReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberReport {
    /// Member item
    pub item: Item,
    /// Profile score of the member's key, `None` when unprofiled
    pub profile_score: Option<i32>,
}

/// Detailed breakdown of a scored team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamReport {
    /// The team's score
    pub score: ScoreTuple,
    /// Sum of member catalog numbers
    pub identity_sum: u64,
    /// Members ordered by name
    pub members: Vec<MemberReport>,
    /// Opposing keys no member handles at least neutrally
    pub bad: Vec<AttributeKey>,
    /// Opposing keys handled neutrally at best
    pub neutral: Vec<AttributeKey>,
    /// Opposing keys only walled, never hit decisively
    pub resist_only: Vec<AttributeKey>,
}

/// Build the detailed report of a team
pub fn report(members: &[Item], profiles: &ProfileMap) -> TeamReport {
    let mut ss = KeySet::with_capacity(profiles.len());
    let mut rs = KeySet::with_capacity(profiles.len());
    let mut neutral = KeySet::with_capacity(profiles.len());
    for profile in members.iter().filter_map(|m| profiles.get(&m.key)) {
        ss.union_with(&profile.safe_super_stab);
        rs.union_with(&profile.resist_stab);
        neutral.union_with(&profile.neutral);
    }

    let favorable = ss.union(&rs);
    let handled = favorable.union(&neutral);
    let mut bad = Vec::new();
    let mut neutral_only = Vec::new();
    let mut resist_only = Vec::new();
    for profile in profiles.iter() {
        let id = profile.id;
        if !handled.contains(id) {
            bad.push(profile.key.clone());
        } else if !favorable.contains(id) {
            neutral_only.push(profile.key.clone());
        } else if !ss.contains(id) {
            resist_only.push(profile.key.clone());
        }
    }

    let mut member_reports: Vec<MemberReport> = members
        .iter()
        .map(|m| MemberReport {
            item: m.clone(),
            profile_score: profiles.get(&m.key).map(|p| p.score),
        })
        .collect();
    member_reports.sort_by(|a, b| a.item.name.cmp(&b.item.name));

    TeamReport {
        score: score(members, profiles),
        identity_sum: identity_sum(members),
        members: member_reports,
        bad,
        neutral: neutral_only,
        resist_only,
    }
}

/// How each member fares against one opposing key
///
/// Members or opponents without a profile yield `None`.
pub fn matchups_against<'a>(
    members: &'a [Item],
    opponent: &AttributeKey,
    profiles: &ProfileMap,
) -> Vec<(&'a Item, Option<Matchup>)> {
    let opponent = profiles.id_of(opponent);
    members
        .iter()
        .map(|m| {
            let matchup = opponent
                .and_then(|id| profiles.get(&m.key).and_then(|p| p.matchup(id)));
            (m, matchup)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deriver::derive;
    use teamcover_domain::{Attribute, AttributeTable, ItemId, Outcome};

    fn mono(a: Attribute) -> AttributeKey {
        AttributeKey::new(a, Attribute::None)
    }

    fn cycle() -> (Vec<Item>, ProfileMap) {
        let items = vec![
            Item::new(ItemId::new(0), "Fire", 4, mono(Attribute::Fire), 500),
            Item::new(ItemId::new(1), "Water", 7, mono(Attribute::Water), 500),
            Item::new(ItemId::new(2), "Grass", 1, mono(Attribute::Grass), 500),
        ];
        let derivation = derive(&items, &AttributeTable::standard());
        (derivation.items, derivation.profiles)
    }

    #[test]
    fn test_pair_score() {
        let (items, profiles) = cycle();
        let tuple = score(&items[0..2], &profiles);

        // Fire covers grass, water covers fire.
        assert_eq!(tuple.coverage, 2);
        // Fire is covered by water and neutral to fire itself.
        assert_eq!(tuple.fallback, 1);
        assert_eq!(tuple.favorable_redundancy, 0);
        assert_eq!(tuple.decisive_redundancy, 0);
        assert_eq!(tuple.fallback_redundancy, 0);
        assert_eq!(tuple.total_score, 0);
        assert_eq!(tuple.uniqueness.ids(), &[ItemId::new(0), ItemId::new(1)]);
    }

    #[test]
    fn test_full_cycle_covers_everything() {
        let (items, profiles) = cycle();
        let tuple = score(&items, &profiles);
        assert_eq!(tuple.coverage, 3);
        assert_eq!(identity_sum(&items), 12);
    }

    #[test]
    fn test_unprofiled_member_contributes_nothing() {
        let (items, profiles) = cycle();
        let stranger = Item::new(ItemId::new(9), "Dragon", 149, mono(Attribute::Dragon), 600);

        let alone = score(&items[0..1], &profiles);
        let with_stranger = score(&[items[0].clone(), stranger], &profiles);

        assert_eq!(alone.quality(), with_stranger.quality());
        assert_ne!(alone.uniqueness, with_stranger.uniqueness);
    }

    #[test]
    fn test_report_lists() {
        let (items, profiles) = cycle();
        let report = report(&items[0..1], &profiles);

        // Fire alone: beats grass, neutral to fire, loses to water.
        assert_eq!(report.bad, vec![mono(Attribute::Water)]);
        assert_eq!(report.neutral, vec![mono(Attribute::Fire)]);
        assert!(report.resist_only.is_empty());
        assert_eq!(report.members.len(), 1);
        assert_eq!(report.members[0].profile_score, Some(0));
    }

    #[test]
    fn test_matchups_against() {
        let (items, profiles) = cycle();
        let lines = matchups_against(&items, &mono(Attribute::Grass), &profiles);
        assert_eq!(lines.len(), 3);

        let fire = lines.iter().find(|(m, _)| m.name == "Fire").unwrap();
        let matchup = fire.1.unwrap();
        assert_eq!(matchup.offense, Outcome::Strong);
        assert_eq!(matchup.defense, Outcome::Strong);

        let missing = matchups_against(&items, &mono(Attribute::Dragon), &profiles);
        assert!(missing.iter().all(|(_, m)| m.is_none()));
    }
}
