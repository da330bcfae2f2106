//! AttributeKey module - the unit of matchup-profile computation

use crate::attribute::{Attribute, AttributeSet};
use crate::modifier::Modifier;
use std::fmt;

/// One tagged component of an [`AttributeKey`]
///
/// Attributes sort before modifiers, so a key's base pair always leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyComponent {
    /// A base attribute (possibly the `NONE` sentinel)
    Attribute(Attribute),
    /// A secondary effect
    Modifier(Modifier),
}

impl fmt::Display for KeyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyComponent::Attribute(a) => write!(f, "{}", a),
            KeyComponent::Modifier(m) => write!(f, "{}", m),
        }
    }
}

/// Unordered pair of base attributes plus zero or more modifiers
///
/// Stored as a sorted, de-duplicated list of components. A mono-attribute
/// key is `{a, NONE}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeKey {
    components: Vec<KeyComponent>,
}

impl AttributeKey {
    /// Create a modifier-free key from two attributes
    ///
    /// Passing the same attribute twice yields the mono key `{a, NONE}`.
    ///
    /// # Examples
    ///
    /// ```
    /// use teamcover_domain::{Attribute, AttributeKey};
    ///
    /// let key = AttributeKey::new(Attribute::Fire, Attribute::Fire);
    /// assert_eq!(key, AttributeKey::new(Attribute::None, Attribute::Fire));
    /// assert_eq!(key.cardinality(), 2);
    /// ```
    pub fn new(first: Attribute, second: Attribute) -> Self {
        let second = if first == second {
            Attribute::None
        } else {
            second
        };
        let (first, second) = if first == Attribute::None {
            (second, Attribute::None)
        } else {
            (first, second)
        };
        let mut components = vec![
            KeyComponent::Attribute(first),
            KeyComponent::Attribute(second),
        ];
        components.sort();
        Self { components }
    }

    /// Create a key carrying the given modifiers
    pub fn with_modifiers(first: Attribute, second: Attribute, modifiers: &[Modifier]) -> Self {
        let mut key = Self::new(first, second);
        key.components
            .extend(modifiers.iter().copied().map(KeyComponent::Modifier));
        key.components.sort();
        key.components.dedup();
        key
    }

    /// Iterate the key's components in sorted order
    pub fn components(&self) -> &[KeyComponent] {
        &self.components
    }

    /// The two base attribute slots, `NONE` included
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.components.iter().filter_map(|c| match c {
            KeyComponent::Attribute(a) => Some(*a),
            KeyComponent::Modifier(_) => None,
        })
    }

    /// The present base attributes (`NONE` skipped)
    pub fn present_attributes(&self) -> AttributeSet {
        self.attributes().filter(|a| !a.is_none()).collect()
    }

    /// The attached modifiers
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.components.iter().filter_map(|c| match c {
            KeyComponent::Modifier(m) => Some(*m),
            KeyComponent::Attribute(_) => None,
        })
    }

    /// Whether any modifier is attached
    pub fn has_modifiers(&self) -> bool {
        self.modifiers().next().is_some()
    }

    /// Whether the key has a single present attribute
    pub fn is_mono(&self) -> bool {
        self.present_attributes().len() == 1
    }

    /// The modifier-free counterpart of this key
    pub fn base(&self) -> Self {
        Self {
            components: self
                .components
                .iter()
                .filter(|c| matches!(c, KeyComponent::Attribute(_)))
                .copied()
                .collect(),
        }
    }

    /// Number of components (2 for a modifier-free key)
    pub fn cardinality(&self) -> usize {
        self.components.len()
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_unordered() {
        let a = AttributeKey::new(Attribute::Water, Attribute::Ground);
        let b = AttributeKey::new(Attribute::Ground, Attribute::Water);
        assert_eq!(a, b);
        assert!(!a.is_mono());
    }

    #[test]
    fn test_mono_key() {
        let key = AttributeKey::new(Attribute::Fire, Attribute::None);
        assert!(key.is_mono());
        assert_eq!(key.present_attributes(), AttributeSet::of(&[Attribute::Fire]));
        assert_eq!(key.attributes().count(), 2);
        assert_eq!(key, AttributeKey::new(Attribute::Fire, Attribute::Fire));
    }

    #[test]
    fn test_modifiers_and_base() {
        let key = AttributeKey::with_modifiers(
            Attribute::Grass,
            Attribute::Water,
            &[Modifier::immune(Attribute::Water), Modifier::immune(Attribute::Water)],
        );
        assert!(key.has_modifiers());
        assert_eq!(key.cardinality(), 3);
        assert_eq!(key.modifiers().count(), 1);
        assert_eq!(key.base(), AttributeKey::new(Attribute::Water, Attribute::Grass));
        assert!(!key.base().has_modifiers());
    }

    #[test]
    fn test_display() {
        let key = AttributeKey::with_modifiers(
            Attribute::Normal,
            Attribute::None,
            &[Modifier::resist(Attribute::Fire)],
        );
        assert_eq!(key.to_string(), "(NORMAL, NONE, FIRE_Resist)");
    }
}
