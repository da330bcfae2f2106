//! Dex selection
//!
//! Narrows the expanded catalog to the items a search should consider:
//! the whole catalog, a set of regions, or a synthetic catalog holding
//! every attribute pair.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use teamcover_domain::{Attribute, AttributeKey, CatalogSource, Item, ItemId};
use tracing::{info, warn};

/// Name fragments marking mega forms
pub const MEGA_NAME_PARTS: &[&str] = &["Mega ", "Ultra "];

/// Regional form tags, keyed by the region name fragment that unlocks them
pub const REGIONAL_TAGS: &[(&str, &[&str])] = &[
    ("alola", &["Alola"]),
    ("galar", &["Galar"]),
    ("hisui", &["Hisui"]),
    ("paldea", &["Paldea", "Blaze Breed", "Combat Breed", "Aqua Breed"]),
];

/// Which part of the catalog to search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DexSelection {
    /// Every item in the catalog
    National,
    /// Every attribute pair plus every modifier key seen in the catalog
    Hypothetical,
    /// Items whose numbers appear in any of the named regions
    Regions(Vec<String>),
}

impl DexSelection {
    /// Build a selection from command-line selectors
    ///
    /// No selectors or a lone `national` select the whole catalog; a lone
    /// `hypothetical` selects the synthetic catalog; anything else is read
    /// as region names.
    pub fn from_selectors<S: AsRef<str>>(selectors: &[S]) -> Self {
        let names: Vec<String> = selectors
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        match names.as_slice() {
            [] => DexSelection::National,
            [one] if one.eq_ignore_ascii_case("national") => DexSelection::National,
            [one] if one.eq_ignore_ascii_case("hypothetical") => DexSelection::Hypothetical,
            _ => DexSelection::Regions(names),
        }
    }
}

impl fmt::Display for DexSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexSelection::National => write!(f, "national"),
            DexSelection::Hypothetical => write!(f, "hypothetical"),
            DexSelection::Regions(regions) => write!(f, "{}", regions.join(", ")),
        }
    }
}

/// Selection tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Drop mega forms from national and regional selections
    pub exclude_megas: bool,
    /// Strength given to synthetic items
    pub strength_floor: u32,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            exclude_megas: true,
            strength_floor: 0,
        }
    }
}

/// Items chosen for a search, plus anything the caller should hear about
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected items in catalog order
    pub items: Vec<Item>,
    /// Skipped selectors and similar non-fatal problems
    pub warnings: Vec<String>,
}

/// Choose the items a search runs over
pub fn select<S: CatalogSource>(
    items: &[Item],
    selection: &DexSelection,
    source: &S,
    options: &SelectionOptions,
) -> Result<Selection, S::Error> {
    let selected = match selection {
        DexSelection::National => Selection {
            items: items
                .iter()
                .filter(|item| !(options.exclude_megas && is_mega(&item.name)))
                .cloned()
                .collect(),
            warnings: Vec::new(),
        },
        DexSelection::Hypothetical => hypothetical(items, options.strength_floor),
        DexSelection::Regions(regions) => select_regions(items, regions, source, options)?,
    };

    info!(
        selection = %selection,
        items = selected.items.len(),
        "Selected dex"
    );
    Ok(selected)
}

fn contains_ignore_case(name: &str, part: &str) -> bool {
    name.to_lowercase().contains(&part.to_lowercase())
}

fn is_mega(name: &str) -> bool {
    MEGA_NAME_PARTS
        .iter()
        .any(|part| contains_ignore_case(name, part))
}

fn select_regions<S: CatalogSource>(
    items: &[Item],
    regions: &[String],
    source: &S,
    options: &SelectionOptions,
) -> Result<Selection, S::Error> {
    let mut warnings = Vec::new();
    let mut numbers = BTreeSet::new();
    let mut included_tags: Vec<&str> = Vec::new();

    for region in regions {
        match source.region_numbers(region)? {
            Some(members) => numbers.extend(members),
            None => {
                warn!(region = %region, "Unknown region, skipping");
                warnings.push(format!("Unknown region '{}' skipped", region));
                continue;
            }
        }

        let lowered = region.to_lowercase();
        for &(fragment, tags) in REGIONAL_TAGS {
            if lowered.contains(fragment) {
                for &tag in tags {
                    if !included_tags.contains(&tag) {
                        included_tags.push(tag);
                    }
                }
            }
        }
    }

    let mut excluded: Vec<&str> = REGIONAL_TAGS
        .iter()
        .flat_map(|(_, tags)| tags.iter().copied())
        .filter(|tag| !included_tags.contains(tag))
        .collect();
    if options.exclude_megas {
        excluded.extend(MEGA_NAME_PARTS.iter().copied());
    }

    let is_regional = |item: &Item| {
        included_tags
            .iter()
            .any(|tag| contains_ignore_case(&item.name, tag))
    };

    let candidates: Vec<&Item> = items
        .iter()
        .filter(|item| numbers.contains(&item.number))
        .filter(|item| {
            !excluded
                .iter()
                .any(|part| contains_ignore_case(&item.name, part))
        })
        .collect();

    // A number with a regional form keeps only its regional forms
    let regional_numbers: BTreeSet<u32> = candidates
        .iter()
        .filter(|&&item| is_regional(item))
        .map(|item| item.number)
        .collect();

    let items = candidates
        .into_iter()
        .filter(|&item| !regional_numbers.contains(&item.number) || is_regional(item))
        .cloned()
        .collect();

    Ok(Selection { items, warnings })
}

fn hypothetical(items: &[Item], strength_floor: u32) -> Selection {
    let mut next_id = items
        .iter()
        .map(|item| item.id.value() + 1)
        .max()
        .unwrap_or(0);
    let mut fresh_id = || {
        let id = ItemId::new(next_id);
        next_id += 1;
        id
    };

    let mut selected = Vec::new();
    for (i, first) in Attribute::ALL.iter().enumerate() {
        for second in &Attribute::ALL[i + 1..] {
            let key = AttributeKey::new(*first, *second);
            let number = selected.len() as u32 + 1;
            selected.push(Item::new(
                fresh_id(),
                format!("{} {}", first, second),
                number,
                key,
                strength_floor,
            ));
        }
    }

    let mut modifier_keys: BTreeMap<&AttributeKey, &Item> = BTreeMap::new();
    for item in items.iter().filter(|item| item.key.has_modifiers()) {
        modifier_keys.entry(&item.key).or_insert(item);
    }
    for (key, source) in modifier_keys {
        let attributes: Vec<Attribute> = key.attributes().collect();
        let modifiers: Vec<String> = key.modifiers().map(|m| m.to_string()).collect();
        let name = format!(
            "{} {} ability: {}",
            attributes.first().copied().unwrap_or(Attribute::None),
            attributes.get(1).copied().unwrap_or(Attribute::None),
            modifiers.join(" ")
        );
        selected.push(Item {
            id: fresh_id(),
            name,
            strength: strength_floor,
            variant: None,
            ..source.clone()
        });
    }

    Selection {
        items: selected,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use teamcover_domain::{CatalogRecord, Modifier};

    struct Regions(Vec<(&'static str, Vec<u32>)>);

    impl CatalogSource for Regions {
        type Error = Infallible;

        fn load_records(&self) -> Result<Vec<CatalogRecord>, Infallible> {
            Ok(Vec::new())
        }

        fn region_numbers(&self, region: &str) -> Result<Option<BTreeSet<u32>>, Infallible> {
            Ok(self
                .0
                .iter()
                .find(|(name, _)| *name == region)
                .map(|(_, numbers)| numbers.iter().copied().collect()))
        }
    }

    fn item(id: u32, name: &str, number: u32, a: Attribute, b: Attribute) -> Item {
        Item::new(ItemId::new(id), name, number, AttributeKey::new(a, b), 500)
    }

    fn catalog() -> Vec<Item> {
        vec![
            item(0, "Vulpix", 37, Attribute::Fire, Attribute::None),
            item(1, "Vulpix Alola", 37, Attribute::Ice, Attribute::None),
            item(2, "Meowth", 52, Attribute::Normal, Attribute::None),
            item(3, "Meowth Galar", 52, Attribute::Steel, Attribute::None),
            item(4, "Charizard", 6, Attribute::Fire, Attribute::Flying),
            item(5, "Mega Charizard X", 6, Attribute::Fire, Attribute::Dragon),
            item(6, "Tauros Blaze Breed", 128, Attribute::Fighting, Attribute::Fire),
            item(7, "Tauros", 128, Attribute::Normal, Attribute::None),
            item(8, "Meganium", 154, Attribute::Grass, Attribute::None),
        ]
    }

    fn names(selection: &Selection) -> Vec<&str> {
        selection.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_from_selectors() {
        assert_eq!(DexSelection::from_selectors::<&str>(&[]), DexSelection::National);
        assert_eq!(DexSelection::from_selectors(&["National"]), DexSelection::National);
        assert_eq!(
            DexSelection::from_selectors(&["hypothetical"]),
            DexSelection::Hypothetical
        );
        assert_eq!(
            DexSelection::from_selectors(&["gen1_kanto", "gen7_alola"]),
            DexSelection::Regions(vec!["gen1_kanto".to_string(), "gen7_alola".to_string()])
        );
    }

    #[test]
    fn test_national_excludes_megas() {
        let source = Regions(Vec::new());
        let selection = select(
            &catalog(),
            &DexSelection::National,
            &source,
            &SelectionOptions::default(),
        )
        .unwrap();
        assert_eq!(selection.items.len(), 8);
        assert!(!names(&selection).contains(&"Mega Charizard X"));
        assert!(names(&selection).contains(&"Meganium"));

        let all = select(
            &catalog(),
            &DexSelection::National,
            &source,
            &SelectionOptions {
                exclude_megas: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(all.items.len(), 9);
    }

    #[test]
    fn test_region_without_regional_forms() {
        let source = Regions(vec![("gen1_kanto", vec![6, 37, 52, 128])]);
        let selection = select(
            &catalog(),
            &DexSelection::Regions(vec!["gen1_kanto".to_string()]),
            &source,
            &SelectionOptions::default(),
        )
        .unwrap();
        assert_eq!(names(&selection), vec!["Vulpix", "Meowth", "Charizard", "Tauros"]);
    }

    #[test]
    fn test_region_keeps_only_its_regional_forms() {
        let source = Regions(vec![("gen7_alola", vec![37, 52])]);
        let selection = select(
            &catalog(),
            &DexSelection::Regions(vec!["gen7_alola".to_string()]),
            &source,
            &SelectionOptions::default(),
        )
        .unwrap();
        assert_eq!(names(&selection), vec!["Vulpix Alola", "Meowth"]);
    }

    #[test]
    fn test_paldea_unlocks_breeds() {
        let source = Regions(vec![("gen9_paldea", vec![128])]);
        let selection = select(
            &catalog(),
            &DexSelection::Regions(vec!["gen9_paldea".to_string()]),
            &source,
            &SelectionOptions::default(),
        )
        .unwrap();
        assert_eq!(names(&selection), vec!["Tauros Blaze Breed"]);
    }

    #[test]
    fn test_unknown_region_warns() {
        let source = Regions(vec![("gen1_kanto", vec![6])]);
        let selection = select(
            &catalog(),
            &DexSelection::Regions(vec!["gen1_kanto".to_string(), "atlantis".to_string()]),
            &source,
            &SelectionOptions::default(),
        )
        .unwrap();
        assert_eq!(names(&selection), vec!["Charizard"]);
        assert_eq!(selection.warnings.len(), 1);
        assert!(selection.warnings[0].contains("atlantis"));
    }

    #[test]
    fn test_hypothetical() {
        let mut items = catalog();
        items.push(
            Item::new(
                ItemId::new(20),
                "Bronzor - Levitate",
                436,
                AttributeKey::with_modifiers(
                    Attribute::Steel,
                    Attribute::Psychic,
                    &[Modifier::immune(Attribute::Ground)],
                ),
                300,
            )
            .with_variant("Levitate"),
        );

        let selection = select(
            &items,
            &DexSelection::Hypothetical,
            &Regions(Vec::new()),
            &SelectionOptions {
                exclude_megas: true,
                strength_floor: 250,
            },
        )
        .unwrap();

        // C(19, 2) pairs plus one modifier key
        assert_eq!(selection.items.len(), 172);
        assert!(selection.items.iter().all(|i| i.strength == 250));
        assert!(selection.items.iter().all(|i| i.id.value() > 20));

        let synthetic = selection.items.last().unwrap();
        assert!(synthetic.name.ends_with("ability: GROUND_Immune"));
        assert!(synthetic.key.has_modifiers());
        assert!(!synthetic.is_variant());

        let keys: BTreeSet<&AttributeKey> = selection.items.iter().map(|i| &i.key).collect();
        assert_eq!(keys.len(), 172);
    }
}
