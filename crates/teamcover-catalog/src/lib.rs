//! Teamcover Catalog
//!
//! Loads the item catalog from disk and narrows it for a search.
//!
//! # Architecture
//!
//! ```text
//! pokedex.csv → CsvCatalog → CatalogRecord → expand → Item → select → search pool
//! ```
//!
//! # Key Features
//!
//! - **CSV Loading**: headerless rows with attributes, strength and abilities
//! - **Region Files**: one catalog number per line, one file per region
//! - **Ability Expansion**: matchup-changing abilities become modifier variants
//! - **Dex Selection**: national, hypothetical or per-region, with regional forms

#![warn(missing_docs)]

pub mod abilities;
pub mod csv_source;
pub mod error;
pub mod selection;

pub use abilities::{expand, modifiers_for, ExpansionOptions};
pub use csv_source::CsvCatalog;
pub use error::{CatalogError, Result};
pub use selection::{select, DexSelection, Selection, SelectionOptions};
