//! Ability expansion
//!
//! Some abilities change how an item fares in matchups. Each one maps to
//! one or two modifiers. An item whose only considered ability has an
//! effect is replaced by its modified variant; an item with a choice of
//! abilities keeps its plain form and gains one variant per effective ability.

use teamcover_domain::{Attribute, AttributeKey, CatalogRecord, Item, ItemId, Modifier, ModifierKind};
use tracing::debug;

const fn effect(kind: ModifierKind, target: Attribute) -> Modifier {
    Modifier { kind, target }
}

/// Abilities with a matchup effect
pub const ABILITY_EFFECTS: &[(&str, &[Modifier])] = &[
    ("Sap Sipper", &[effect(ModifierKind::Immune, Attribute::Grass)]),
    ("Storm Drain", &[effect(ModifierKind::Immune, Attribute::Water)]),
    ("Water Absorb", &[effect(ModifierKind::Immune, Attribute::Water)]),
    ("Motor Drive", &[effect(ModifierKind::Immune, Attribute::Electric)]),
    ("Volt Absorb", &[effect(ModifierKind::Immune, Attribute::Electric)]),
    (
        "Thick Fat",
        &[
            effect(ModifierKind::Resist, Attribute::Fire),
            effect(ModifierKind::Resist, Attribute::Ice),
        ],
    ),
    ("Levitate", &[effect(ModifierKind::Immune, Attribute::Ground)]),
    ("Earth Eater", &[effect(ModifierKind::Immune, Attribute::Ground)]),
    ("Flash Fire", &[effect(ModifierKind::Immune, Attribute::Fire)]),
    ("Well-Baked Body", &[effect(ModifierKind::Immune, Attribute::Fire)]),
    ("Water Bubble", &[effect(ModifierKind::Resist, Attribute::Fire)]),
    ("Heatproof", &[effect(ModifierKind::Resist, Attribute::Fire)]),
    ("Steelworker", &[effect(ModifierKind::Stab, Attribute::Steel)]),
];

/// Modifiers granted by an ability, if it has a matchup effect
///
/// Matching ignores case and treats hyphens and spaces alike, so both
/// `Water Bubble` and `Water-Bubble` resolve.
pub fn modifiers_for(ability: &str) -> Option<&'static [Modifier]> {
    let wanted = normalize(ability);
    if wanted.is_empty() {
        return None;
    }
    ABILITY_EFFECTS
        .iter()
        .find(|(name, _)| normalize(name) == wanted)
        .map(|(_, modifiers)| *modifiers)
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '-' { ' ' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Which abilities to consider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Expand abilities at all
    pub assess_modifiers: bool,
    /// Consider hidden abilities too
    pub include_hidden: bool,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            assess_modifiers: true,
            include_hidden: false,
        }
    }
}

/// Turn raw records into items, expanding abilities into variants
///
/// Ids are assigned sequentially in output order.
pub fn expand(records: &[CatalogRecord], options: &ExpansionOptions) -> Vec<Item> {
    let mut items = Vec::with_capacity(records.len());
    let mut next_id = 0u32;
    let mut push = |items: &mut Vec<Item>, item: Item| {
        items.push(Item {
            id: ItemId::new(next_id),
            ..item
        });
        next_id += 1;
    };

    for record in records {
        let plain = record.to_item(ItemId::new(0));
        if !options.assess_modifiers {
            push(&mut items, plain);
            continue;
        }

        let mut abilities: Vec<&str> = vec![record.ability1.as_str()];
        if !record.ability2.is_empty() {
            abilities.push(&record.ability2);
        }
        if options.include_hidden && !record.hidden_ability.is_empty() {
            abilities.push(&record.hidden_ability);
        }
        let mut seen = Vec::new();
        abilities.retain(|a| !a.trim().is_empty() && !seen.contains(a) && {
            seen.push(*a);
            true
        });

        let effective: Vec<(&str, &[Modifier])> = abilities
            .iter()
            .filter_map(|a| modifiers_for(a).map(|m| (*a, m)))
            .collect();

        if abilities.len() == 1 && effective.len() == 1 {
            let (ability, modifiers) = effective[0];
            debug!(item = %record.name, ability, "Replacing with ability variant");
            push(&mut items, variant(record, ability, modifiers));
            continue;
        }

        push(&mut items, plain);
        for (ability, modifiers) in effective {
            debug!(item = %record.name, ability, "Adding ability variant");
            push(&mut items, variant(record, ability, modifiers));
        }
    }

    items
}

fn variant(record: &CatalogRecord, ability: &str, modifiers: &[Modifier]) -> Item {
    let key = AttributeKey::with_modifiers(record.primary, record.secondary, modifiers);
    Item::new(
        ItemId::new(0),
        format!("{} - {}", record.name, ability),
        record.number,
        key,
        record.strength,
    )
    .with_variant(ability)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, a1: &str, a2: &str, hidden: &str) -> CatalogRecord {
        CatalogRecord {
            name: name.to_string(),
            number: 1,
            primary: Attribute::Water,
            secondary: Attribute::None,
            strength: 400,
            ability1: a1.to_string(),
            ability2: a2.to_string(),
            hidden_ability: hidden.to_string(),
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(modifiers_for("Levitate").map(|m| m.len()), Some(1));
        assert_eq!(modifiers_for("thick fat").map(|m| m.len()), Some(2));
        assert!(modifiers_for("Water-Bubble").is_some());
        assert!(modifiers_for("Overgrow").is_none());
        assert!(modifiers_for("").is_none());
    }

    #[test]
    fn test_single_ability_replaced() {
        let items = expand(&[record("Bronzor", "Levitate", "", "")], &ExpansionOptions::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bronzor - Levitate");
        assert_eq!(items[0].variant.as_deref(), Some("Levitate"));
        assert!(items[0].key.has_modifiers());
    }

    #[test]
    fn test_choice_adds_variant() {
        let items = expand(
            &[record("Lanturn", "Volt Absorb", "Illuminate", "Water Absorb")],
            &ExpansionOptions::default(),
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Lanturn");
        assert!(!items[0].is_variant());
        assert_eq!(items[1].name, "Lanturn - Volt Absorb");
        assert_eq!(items[1].id, ItemId::new(1));
    }

    #[test]
    fn test_hidden_only_when_enabled() {
        let records = [record("Vaporeon", "Water Absorb", "", "Hydration")];
        let plain = expand(&records, &ExpansionOptions::default());
        assert_eq!(plain.len(), 1);
        assert!(plain[0].is_variant());

        let with_hidden = expand(
            &records,
            &ExpansionOptions {
                include_hidden: true,
                ..Default::default()
            },
        );
        assert_eq!(with_hidden.len(), 2);
        assert_eq!(with_hidden[0].name, "Vaporeon");
        assert_eq!(with_hidden[1].name, "Vaporeon - Water Absorb");
    }

    #[test]
    fn test_disabled() {
        let items = expand(
            &[record("Bronzor", "Levitate", "", "")],
            &ExpansionOptions {
                assess_modifiers: false,
                include_hidden: false,
            },
        );
        assert_eq!(items[0].name, "Bronzor");
        assert!(!items[0].key.has_modifiers());
    }

    #[test]
    fn test_two_effective_abilities() {
        let items = expand(
            &[record("Heatran", "Flash Fire", "", "Flame Body")],
            &ExpansionOptions::default(),
        );
        assert_eq!(items.len(), 1);

        let items = expand(
            &[record("Mamoswine", "Oblivious", "Snow Cloak", "Thick Fat")],
            &ExpansionOptions {
                include_hidden: true,
                ..Default::default()
            },
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].key.modifiers().count(), 2);
    }
}
