//! Forced team members
//!
//! Resolves name patterns against the full catalog and seats the matching
//! items in the team before search starts.

use teamcover_domain::{Item, ProfileMap};
use tracing::{info, warn};

/// Members resolved from name patterns, plus anything worth telling the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedResolution {
    /// Seated members, in pattern order
    pub members: Vec<Item>,
    /// Recoverable problems (no match, ambiguous match, unprofiled key)
    pub warnings: Vec<String>,
}

/// Resolve forced-member patterns
///
/// Each pattern is a case-insensitive substring over `catalog`. A resolved
/// item is seated as the pool item of the same name if there is one, else as
/// a pool item with the same key (a stronger proxy), else as itself.
pub fn resolve(
    patterns: &[String],
    catalog: &[Item],
    pool: &[Item],
    profiles: &ProfileMap,
) -> ForcedResolution {
    let mut resolution = ForcedResolution::default();

    for pattern in patterns {
        let Some(found) = find_item(pattern, catalog, &mut resolution.warnings) else {
            continue;
        };

        let seated = if let Some(same) = pool.iter().find(|p| p.name == found.name) {
            same
        } else if let Some(proxy) = pool.iter().find(|p| p.key == found.key) {
            info!(
                proxy = %proxy.name,
                requested = %found.name,
                "Seating same-key proxy with better strength"
            );
            proxy
        } else {
            found
        };

        if resolution.members.iter().any(|m| m.id == seated.id) {
            let message = format!("'{}' resolves to {} which is already seated", pattern, seated.name);
            warn!("{}", message);
            resolution.warnings.push(message);
            continue;
        }

        if profiles.get(&seated.key).is_none() {
            let message = format!(
                "{} has key {} which was not profiled; it takes a slot but contributes nothing",
                seated.name, seated.key
            );
            warn!("{}", message);
            resolution.warnings.push(message);
        }

        resolution.members.push(seated.clone());
    }

    resolution
}

/// Find the single catalog item a pattern names
///
/// Exact (case-insensitive) names win over substring matches; remaining
/// ambiguity resolves to the lowest id with a warning.
pub fn find_item<'a>(
    pattern: &str,
    catalog: &'a [Item],
    warnings: &mut Vec<String>,
) -> Option<&'a Item> {
    let needle = pattern.to_lowercase();
    let matches: Vec<&Item> = catalog
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => {
            let message = format!("No catalog item matches '{}'; nothing added for it", pattern);
            warn!("{}", message);
            warnings.push(message);
            None
        }
        [only] => Some(*only),
        several => {
            if let Some(exact) = several.iter().find(|i| i.name.eq_ignore_ascii_case(pattern)) {
                return Some(*exact);
            }
            let first = several.iter().min_by_key(|i| i.id).copied();
            if let Some(first) = first {
                let message = format!(
                    "Multiple catalog items match '{}'; using {}",
                    pattern, first.name
                );
                warn!("{}", message);
                warnings.push(message);
            }
            first
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deriver::derive;
    use teamcover_domain::{Attribute, AttributeKey, AttributeTable, ItemId};

    fn item(id: u32, name: &str, key: AttributeKey, strength: u32) -> Item {
        Item::new(ItemId::new(id), name, id + 1, key, strength)
    }

    fn mono(a: Attribute) -> AttributeKey {
        AttributeKey::new(a, Attribute::None)
    }

    fn catalog() -> Vec<Item> {
        vec![
            item(0, "Pikachu", mono(Attribute::Electric), 320),
            item(1, "Raichu", mono(Attribute::Electric), 485),
            item(2, "Raichu Alola", AttributeKey::new(Attribute::Electric, Attribute::Psychic), 485),
            item(3, "Charizard", AttributeKey::new(Attribute::Fire, Attribute::Flying), 534),
            item(4, "Dragonite", AttributeKey::new(Attribute::Dragon, Attribute::Flying), 600),
        ]
    }

    #[test]
    fn test_exact_name_preferred() {
        let catalog = catalog();
        let mut warnings = Vec::new();
        let found = find_item("raichu", &catalog, &mut warnings).unwrap();
        assert_eq!(found.name, "Raichu");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ambiguous_takes_lowest_id() {
        let catalog = catalog();
        let mut warnings = Vec::new();
        let found = find_item("chu", &catalog, &mut warnings).unwrap();
        assert_eq!(found.name, "Pikachu");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_no_match_warns() {
        let catalog = catalog();
        let derivation = derive(&catalog, &AttributeTable::standard());
        let resolution = resolve(
            &["Mewtwo".to_string()],
            &catalog,
            &catalog,
            &derivation.profiles,
        );
        assert!(resolution.members.is_empty());
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_proxy_seated_from_pool() {
        let catalog = catalog();
        let derivation = derive(&catalog, &AttributeTable::standard());
        // Pikachu was reduced away; Raichu shares its key.
        let pool = vec![catalog[1].clone(), catalog[3].clone()];
        let resolution = resolve(&["pikachu".to_string()], &catalog, &pool, &derivation.profiles);

        assert_eq!(resolution.members.len(), 1);
        assert_eq!(resolution.members[0].name, "Raichu");
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_unprofiled_member_still_seated() {
        let catalog = catalog();
        let derivation = derive(&catalog[..3], &AttributeTable::standard());
        let resolution = resolve(
            &["Dragonite".to_string()],
            &catalog,
            &catalog[..3],
            &derivation.profiles,
        );
        assert_eq!(resolution.members.len(), 1);
        assert_eq!(resolution.members[0].name, "Dragonite");
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_duplicate_patterns_seat_once() {
        let catalog = catalog();
        let derivation = derive(&catalog, &AttributeTable::standard());
        let patterns = vec!["Charizard".to_string(), "charizard".to_string()];
        let resolution = resolve(&patterns, &catalog, &catalog, &derivation.profiles);
        assert_eq!(resolution.members.len(), 1);
        assert_eq!(resolution.warnings.len(), 1);
    }
}
