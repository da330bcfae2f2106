//! Teamcover Domain Layer
//!
//! This crate contains the core domain model for Teamcover. It has ZERO
//! external dependencies and defines the fundamental concepts, value objects,
//! and trait interfaces that the catalog, engine and CLI crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Attribute**: one of the 18 elemental categories plus the `NONE` sentinel
//! - **AttributeTable**: the fixed strong/weak chart between attributes
//! - **Modifier**: a secondary effect (resist, immune, extra stab) carried by an item
//! - **AttributeKey**: two attributes plus modifiers, the unit of matchup computation
//! - **Profile**: offense/defense relations and per-opponent matchup values of one key
//! - **ScoreTuple**: the lexicographic ordering key used to rank teams
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - No external crate dependencies
//! - Pure domain logic only
//! - Loading and search live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod item;
pub mod key;
pub mod modifier;
pub mod profile;
pub mod relations;
pub mod score;
pub mod traits;

// Re-exports for convenience
pub use attribute::{Attribute, AttributeSet, AttributeTable};
pub use item::{CatalogRecord, Item, ItemId};
pub use key::{AttributeKey, KeyComponent};
pub use modifier::{Modifier, ModifierKind};
pub use profile::{Classification, KeyId, KeySet, Matchup, Outcome, Profile, ProfileMap};
pub use relations::Relations;
pub use score::{ScoreTuple, TeamIdentity};
pub use traits::CatalogSource;
