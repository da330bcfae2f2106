//! Attribute module - base categories and the fixed strong/weak chart

use std::fmt;

/// Number of attribute values, the `NONE` sentinel included
pub const ATTRIBUTE_COUNT: usize = 19;

/// One of the 18 elemental categories, or the `NONE` sentinel
///
/// `NONE` fills the second slot of a mono-attribute key. It has no relations
/// of its own: nothing is strong or weak against it and it attacks nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    /// Normal
    Normal,
    /// Fire
    Fire,
    /// Water
    Water,
    /// Electric
    Electric,
    /// Grass
    Grass,
    /// Ice
    Ice,
    /// Fighting
    Fighting,
    /// Poison
    Poison,
    /// Ground
    Ground,
    /// Flying
    Flying,
    /// Psychic
    Psychic,
    /// Bug
    Bug,
    /// Rock
    Rock,
    /// Ghost
    Ghost,
    /// Dragon
    Dragon,
    /// Dark
    Dark,
    /// Steel
    Steel,
    /// Fairy
    Fairy,
    /// Sentinel for an empty second slot
    None,
}

impl Attribute {
    /// Every attribute value in enumeration order
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Normal,
        Attribute::Fire,
        Attribute::Water,
        Attribute::Electric,
        Attribute::Grass,
        Attribute::Ice,
        Attribute::Fighting,
        Attribute::Poison,
        Attribute::Ground,
        Attribute::Flying,
        Attribute::Psychic,
        Attribute::Bug,
        Attribute::Rock,
        Attribute::Ghost,
        Attribute::Dragon,
        Attribute::Dark,
        Attribute::Steel,
        Attribute::Fairy,
        Attribute::None,
    ];

    /// Position of the attribute in [`Attribute::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this is the `NONE` sentinel
    pub fn is_none(self) -> bool {
        self == Attribute::None
    }

    /// Get the attribute name as an upper-case string
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Normal => "NORMAL",
            Attribute::Fire => "FIRE",
            Attribute::Water => "WATER",
            Attribute::Electric => "ELECTRIC",
            Attribute::Grass => "GRASS",
            Attribute::Ice => "ICE",
            Attribute::Fighting => "FIGHTING",
            Attribute::Poison => "POISON",
            Attribute::Ground => "GROUND",
            Attribute::Flying => "FLYING",
            Attribute::Psychic => "PSYCHIC",
            Attribute::Bug => "BUG",
            Attribute::Rock => "ROCK",
            Attribute::Ghost => "GHOST",
            Attribute::Dragon => "DRAGON",
            Attribute::Dark => "DARK",
            Attribute::Steel => "STEEL",
            Attribute::Fairy => "FAIRY",
            Attribute::None => "NONE",
        }
    }

    /// Parse an attribute name, case-insensitively
    ///
    /// An empty string parses as `NONE`, matching catalog rows that leave the
    /// second attribute blank.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Some(Attribute::None);
        }
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid attribute: {}", s))
    }
}

/// A set of attributes stored as a bit mask
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AttributeSet(u32);

impl AttributeSet {
    /// The empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set of every attribute, `NONE` included
    pub const fn all() -> Self {
        Self((1 << ATTRIBUTE_COUNT) - 1)
    }

    /// Build a set from a slice of attributes
    pub fn of(attributes: &[Attribute]) -> Self {
        attributes.iter().copied().collect()
    }

    /// Add an attribute
    pub fn insert(&mut self, attribute: Attribute) {
        self.0 |= 1 << attribute.index();
    }

    /// Remove an attribute
    pub fn remove(&mut self, attribute: Attribute) {
        self.0 &= !(1 << attribute.index());
    }

    /// Check membership
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.0 & (1 << attribute.index()) != 0
    }

    /// Set union
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Set intersection
    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Set difference (`self - other`)
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Complement relative to [`AttributeSet::all`]
    pub fn complement(self) -> Self {
        Self::all().difference(self)
    }

    /// Whether every member of `self` is in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        Attribute::ALL.iter().copied().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = AttributeSet::empty();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Hard immunities: the defender never takes more than a resisted hit from
/// the listed attackers, whatever its other attribute says.
const IMMUNITIES: &[(Attribute, &[Attribute])] = &[
    (Attribute::Ghost, &[Attribute::Normal, Attribute::Fighting]),
    (Attribute::Ground, &[Attribute::Electric]),
    (Attribute::Flying, &[Attribute::Ground]),
    (Attribute::Dark, &[Attribute::Psychic]),
    (Attribute::Steel, &[Attribute::Poison]),
    (Attribute::Fairy, &[Attribute::Dragon]),
];

/// The fixed strong/weak chart between base attributes
///
/// Built once from asymmetric declarations: `declare_strong(a, ..)` means
/// `a` attacks the listed attributes super effectively, `declare_weak(a, ..)`
/// means they resist it. Every other pairing is neutral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    strong_against: [AttributeSet; ATTRIBUTE_COUNT],
    weak_against: [AttributeSet; ATTRIBUTE_COUNT],
    vulnerable_to: [AttributeSet; ATTRIBUTE_COUNT],
    resists: [AttributeSet; ATTRIBUTE_COUNT],
    immune_to: [AttributeSet; ATTRIBUTE_COUNT],
}

impl AttributeTable {
    /// A table with no declarations: every matchup is neutral
    pub fn empty() -> Self {
        Self {
            strong_against: [AttributeSet::empty(); ATTRIBUTE_COUNT],
            weak_against: [AttributeSet::empty(); ATTRIBUTE_COUNT],
            vulnerable_to: [AttributeSet::empty(); ATTRIBUTE_COUNT],
            resists: [AttributeSet::empty(); ATTRIBUTE_COUNT],
            immune_to: [AttributeSet::empty(); ATTRIBUTE_COUNT],
        }
    }

    /// The standard 18-attribute chart with its immunity overrides
    pub fn standard() -> Self {
        use Attribute::*;

        let mut table = Self::empty();
        table.declare_strong(Bug, &[Psychic, Dark, Grass]);
        table.declare_weak(Bug, &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy]);
        table.declare_strong(Dark, &[Psychic, Ghost]);
        table.declare_weak(Dark, &[Fighting, Dark, Fairy]);
        table.declare_strong(Dragon, &[Dragon]);
        table.declare_weak(Dragon, &[Steel, Fairy]);
        table.declare_strong(Electric, &[Water, Flying]);
        table.declare_weak(Electric, &[Electric, Grass, Dragon, Ground]);
        table.declare_strong(Fairy, &[Fighting, Dragon, Dark]);
        table.declare_weak(Fairy, &[Fire, Poison, Steel]);
        table.declare_strong(Fighting, &[Normal, Ice, Rock, Dark, Steel]);
        table.declare_weak(Fighting, &[Poison, Flying, Psychic, Bug, Fairy, Ghost]);
        table.declare_strong(Fire, &[Grass, Ice, Bug, Steel]);
        table.declare_weak(Fire, &[Fire, Water, Rock, Dragon]);
        table.declare_strong(Flying, &[Grass, Fighting, Bug]);
        table.declare_weak(Flying, &[Electric, Rock, Steel]);
        table.declare_strong(Ghost, &[Psychic, Ghost]);
        table.declare_weak(Ghost, &[Dark, Normal]);
        table.declare_strong(Grass, &[Water, Ground, Rock]);
        table.declare_weak(Grass, &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel]);
        table.declare_strong(Ground, &[Fire, Electric, Poison, Rock, Steel]);
        table.declare_weak(Ground, &[Grass, Bug, Flying]);
        table.declare_strong(Ice, &[Grass, Ground, Flying, Dragon]);
        table.declare_weak(Ice, &[Fire, Water, Ice, Steel]);
        table.declare_weak(Normal, &[Rock, Steel, Ghost]);
        table.declare_strong(Poison, &[Grass, Fairy]);
        table.declare_weak(Poison, &[Poison, Ground, Rock, Ghost, Steel]);
        table.declare_strong(Psychic, &[Fighting, Poison]);
        table.declare_weak(Psychic, &[Psychic, Steel, Dark]);
        table.declare_strong(Rock, &[Fire, Ice, Flying, Bug]);
        table.declare_weak(Rock, &[Fighting, Ground, Steel]);
        table.declare_strong(Steel, &[Ice, Rock, Fairy]);
        table.declare_weak(Steel, &[Fire, Water, Electric, Steel]);
        table.declare_strong(Water, &[Fire, Ground, Rock]);
        table.declare_weak(Water, &[Grass, Water, Dragon]);

        for (defender, attackers) in IMMUNITIES {
            table.declare_immune(*defender, attackers);
        }
        table
    }

    /// Declare that `attacker` is super effective against each of `defenders`
    pub fn declare_strong(&mut self, attacker: Attribute, defenders: &[Attribute]) {
        for defender in defenders {
            self.strong_against[attacker.index()].insert(*defender);
            self.vulnerable_to[defender.index()].insert(attacker);
        }
    }

    /// Declare that each of `defenders` resists `attacker`
    pub fn declare_weak(&mut self, attacker: Attribute, defenders: &[Attribute]) {
        for defender in defenders {
            self.weak_against[attacker.index()].insert(*defender);
            self.resists[defender.index()].insert(attacker);
        }
    }

    /// Declare a hard immunity of `defender` against each of `attackers`
    pub fn declare_immune(&mut self, defender: Attribute, attackers: &[Attribute]) {
        for attacker in attackers {
            self.immune_to[defender.index()].insert(*attacker);
        }
    }

    /// Attributes `attribute` attacks super effectively
    pub fn strong_against(&self, attribute: Attribute) -> AttributeSet {
        self.strong_against[attribute.index()]
    }

    /// Attributes that resist `attribute`
    pub fn weak_against(&self, attribute: Attribute) -> AttributeSet {
        self.weak_against[attribute.index()]
    }

    /// Attributes `attribute` attacks with regular effectiveness
    pub fn neutral_against(&self, attribute: Attribute) -> AttributeSet {
        self.strong_against(attribute)
            .union(self.weak_against(attribute))
            .complement()
    }

    /// Attributes that hit `attribute` super effectively
    pub fn vulnerable_to(&self, attribute: Attribute) -> AttributeSet {
        self.vulnerable_to[attribute.index()]
    }

    /// Attributes that `attribute` resists
    pub fn resists(&self, attribute: Attribute) -> AttributeSet {
        self.resists[attribute.index()]
    }

    /// Attributes that hit `attribute` with regular effectiveness
    pub fn neutral_to(&self, attribute: Attribute) -> AttributeSet {
        self.vulnerable_to(attribute)
            .union(self.resists(attribute))
            .complement()
    }

    /// Attackers `attribute` is immune to
    pub fn immune_to(&self, attribute: Attribute) -> AttributeSet {
        self.immune_to[attribute.index()]
    }

    /// Apply the immunity overrides of every attribute in `defenders`
    ///
    /// Immune attackers are moved into `resists` and out of `vulnerable`.
    /// Applying the overrides twice leaves the sets unchanged.
    pub fn apply_immunities(
        &self,
        defenders: AttributeSet,
        vulnerable: &mut AttributeSet,
        resists: &mut AttributeSet,
    ) {
        for defender in defenders.iter() {
            let immune = self.immune_to(defender);
            *resists = resists.union(immune);
            *vulnerable = vulnerable.difference(immune);
        }
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self::standard()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn attribute() -> impl Strategy<Value = Attribute> {
        (0..ATTRIBUTE_COUNT).prop_map(|i| Attribute::ALL[i])
    }

    proptest! {
        /// Property: immunity overrides applied twice equal applied once
        #[test]
        fn test_immunities_idempotent(a in attribute(), b in attribute(), v: u32, r: u32) {
            let table = AttributeTable::standard();
            let defenders = AttributeSet::of(&[a, b]);
            let mask = AttributeSet::all();
            let mut vulnerable = AttributeSet(v).intersection(mask);
            let mut resists = AttributeSet(r).intersection(mask);

            table.apply_immunities(defenders, &mut vulnerable, &mut resists);
            let once = (vulnerable, resists);
            table.apply_immunities(defenders, &mut vulnerable, &mut resists);

            prop_assert_eq!(once, (vulnerable, resists));
            prop_assert!(vulnerable.intersection(resists).intersection(
                table.immune_to(a).union(table.immune_to(b))).is_empty());
        }
    }
}
