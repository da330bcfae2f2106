//! Relations module - attribute-level offense/defense sets of one key

use crate::attribute::{AttributeSet, AttributeTable};
use crate::key::AttributeKey;
use crate::modifier::ModifierKind;

/// The six attribute-level relation sets of a key plus its attack set
///
/// Two keys with equal `Relations` behave identically in every matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relations {
    /// Attributes this key attacks super effectively
    pub strong_against: AttributeSet,
    /// Attributes that resist every attack of this key
    pub weak_against: AttributeSet,
    /// Attributes this key attacks with regular effectiveness
    pub neutral_against: AttributeSet,
    /// Attackers that hit this key super effectively
    pub vulnerable: AttributeSet,
    /// Attackers this key resists or is immune to
    pub resists: AttributeSet,
    /// Attackers that hit this key with regular effectiveness
    pub neutral_to: AttributeSet,
    /// Attributes the key attacks with: present attributes plus `Stab` targets
    pub attack: AttributeSet,
}

impl Relations {
    /// Compute the relations of a key from the attribute chart
    ///
    /// # Examples
    ///
    /// ```
    /// use teamcover_domain::{Attribute, AttributeKey, AttributeTable, Relations};
    ///
    /// let table = AttributeTable::standard();
    /// let key = AttributeKey::new(Attribute::Water, Attribute::Ground);
    /// let relations = Relations::for_key(&key, &table);
    /// assert!(relations.resists.contains(Attribute::Electric));
    /// assert!(!relations.vulnerable.contains(Attribute::Electric));
    /// ```
    pub fn for_key(key: &AttributeKey, table: &AttributeTable) -> Self {
        let present = key.present_attributes();

        let mut strong_against = AttributeSet::empty();
        let mut union_vulnerable = AttributeSet::empty();
        let mut union_resists = AttributeSet::empty();
        for attribute in present.iter() {
            strong_against = strong_against.union(table.strong_against(attribute));
            union_vulnerable = union_vulnerable.union(table.vulnerable_to(attribute));
            union_resists = union_resists.union(table.resists(attribute));
        }

        // A mono key intersects over its single present attribute.
        let mut weak_against = present
            .iter()
            .map(|a| table.weak_against(a))
            .reduce(AttributeSet::intersection)
            .unwrap_or_default();

        let mut vulnerable = union_vulnerable.difference(union_resists);
        let mut resists = union_resists.difference(union_vulnerable);
        table.apply_immunities(present, &mut vulnerable, &mut resists);

        let mut attack = present;
        for modifier in key.modifiers() {
            let target = modifier.target;
            match modifier.kind {
                ModifierKind::Resist => {
                    if vulnerable.contains(target) {
                        vulnerable.remove(target);
                    } else {
                        resists.insert(target);
                    }
                }
                ModifierKind::Immune => {
                    vulnerable.remove(target);
                    resists.insert(target);
                }
                ModifierKind::Stab => {
                    let extra = table.strong_against(target);
                    strong_against = strong_against.union(extra);
                    weak_against = weak_against.difference(extra);
                    attack.insert(target);
                }
            }
        }

        Self {
            strong_against,
            weak_against,
            neutral_against: strong_against.union(weak_against).complement(),
            vulnerable,
            resists,
            neutral_to: vulnerable.union(resists).complement(),
            attack,
        }
    }
}
