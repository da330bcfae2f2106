//! Modifier module - secondary effects carried by an item

use crate::attribute::Attribute;
use std::fmt;

/// Kind of secondary effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKind {
    /// Halves damage from the target attribute (cancels a vulnerability)
    Resist,
    /// Nullifies damage from the target attribute
    Immune,
    /// Attacks with the target attribute as if it were one of the key's own
    Stab,
}

impl ModifierKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::Resist => "Resist",
            ModifierKind::Immune => "Immune",
            ModifierKind::Stab => "Stab",
        }
    }

    /// Whether this modifier changes the defensive sets
    pub fn is_defensive(&self) -> bool {
        matches!(self, ModifierKind::Resist | ModifierKind::Immune)
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A secondary effect with its target attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Modifier {
    /// What the modifier does
    pub kind: ModifierKind,
    /// The attribute it applies to
    pub target: Attribute,
}

impl Modifier {
    /// Create a modifier
    pub fn new(kind: ModifierKind, target: Attribute) -> Self {
        Self { kind, target }
    }

    /// Shorthand for a `Resist` modifier
    pub fn resist(target: Attribute) -> Self {
        Self::new(ModifierKind::Resist, target)
    }

    /// Shorthand for an `Immune` modifier
    pub fn immune(target: Attribute) -> Self {
        Self::new(ModifierKind::Immune, target)
    }

    /// Shorthand for a `Stab` modifier
    pub fn stab(target: Attribute) -> Self {
        Self::new(ModifierKind::Stab, target)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.target, self.kind)
    }
}
