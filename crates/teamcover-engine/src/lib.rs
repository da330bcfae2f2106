//! Teamcover Engine
//!
//! Matchup derivation and team search over a catalog of attribute-keyed items.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Derivation**: one matchup profile per distinct attribute key
//! - **Reduction**: shrinking the candidate pool without losing the best coverage
//! - **Forced members**: seating user-chosen items before search
//! - **Search**: parallel branch-and-bound over fixed-size teams
//! - **Scoring**: the seven-field lexicographic score of a team
//!
//! # Pipeline
//!
//! ```
//! use teamcover_domain::{Attribute, AttributeKey, AttributeTable, Item, ItemId};
//! use teamcover_engine::{derive, reduce, search, ReducePolicy, SearchOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = AttributeTable::standard();
//! let catalog: Vec<Item> = [Attribute::Fire, Attribute::Water, Attribute::Grass]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, a)| {
//!         let key = AttributeKey::new(*a, Attribute::None);
//!         Item::new(ItemId::new(i as u32), a.as_str(), i as u32 + 1, key, 500)
//!     })
//!     .collect();
//!
//! let derivation = derive(&catalog, &table);
//! let reduction = reduce(&derivation.items, &derivation.profiles, &table, &ReducePolicy::default())?;
//! let outcome = search(&reduction.pool, &[], &derivation.profiles, &SearchOptions::sequential(2))?;
//!
//! assert_eq!(outcome.best.map(|b| b.coverage), Some(2));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;

pub mod deriver;
pub mod forced;
pub mod reducer;
pub mod scorer;
pub mod search;

pub use deriver::{derive, Derivation};
pub use error::{EngineError, Result};
pub use forced::{resolve, ForcedResolution};
pub use reducer::{reduce, ReducePolicy, Reduction, ReductionReport};
pub use scorer::{report, score, MemberReport, TeamReport};
pub use search::{search, SearchAccumulator, SearchOptions, SearchOutcome, SearchStats, Team};
