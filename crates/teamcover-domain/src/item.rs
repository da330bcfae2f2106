//! Item module - catalog entries

use crate::attribute::Attribute;
use crate::key::AttributeKey;
use std::fmt;

/// Unique serial of a catalog item
///
/// Assigned in load order after ability expansion. Unlike the catalog
/// number, no two items share an `ItemId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u32);

impl ItemId {
    /// Create an ItemId from a raw serial
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw serial
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog entry ready for derivation
///
/// Items are never mutated in place: normalization and ability expansion
/// build new items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Unique serial
    pub id: ItemId,
    /// Display name (variants carry `"<name> - <ability>"`)
    pub name: String,
    /// Catalog number; forms and variants share it
    pub number: u32,
    /// The attribute key this item is profiled under
    pub key: AttributeKey,
    /// Scalar strength value
    pub strength: u32,
    /// Name of the ability the key's modifiers come from, if any
    pub variant: Option<String>,
}

impl Item {
    /// Create a modifier-free item
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        number: u32,
        key: AttributeKey,
        strength: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            number,
            key,
            strength,
            variant: None,
        }
    }

    /// Builder: attach the modifier source name
    pub fn with_variant(mut self, ability: impl Into<String>) -> Self {
        self.variant = Some(ability.into());
        self
    }

    /// Whether this item is a modifier variant
    pub fn is_variant(&self) -> bool {
        self.variant.is_some()
    }

    /// A copy of this item carrying `key` with the modifier source cleared
    pub fn rekeyed(&self, key: AttributeKey) -> Self {
        Self {
            key,
            variant: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.key)
    }
}

/// One raw catalog row, before ability expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    /// Display name
    pub name: String,
    /// Catalog number
    pub number: u32,
    /// First attribute
    pub primary: Attribute,
    /// Second attribute (`NONE` for mono items)
    pub secondary: Attribute,
    /// Scalar strength value
    pub strength: u32,
    /// First regular ability
    pub ability1: String,
    /// Second regular ability (may be empty)
    pub ability2: String,
    /// Hidden ability (may be empty)
    pub hidden_ability: String,
}

impl CatalogRecord {
    /// The modifier-free key of this record
    pub fn key(&self) -> AttributeKey {
        AttributeKey::new(self.primary, self.secondary)
    }

    /// Convert to an item without any ability expansion
    pub fn to_item(&self, id: ItemId) -> Item {
        Item::new(id, self.name.clone(), self.number, self.key(), self.strength)
    }
}
