//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::item::CatalogRecord;
use std::collections::BTreeSet;

/// Trait for reading the raw catalog
///
/// Implemented by the infrastructure layer (teamcover-catalog)
pub trait CatalogSource {
    /// Error type for catalog operations
    type Error;

    /// Load every catalog row in file order
    fn load_records(&self) -> Result<Vec<CatalogRecord>, Self::Error>;

    /// Catalog numbers belonging to a region
    ///
    /// Returns `Ok(None)` when the region is unknown to this source.
    fn region_numbers(&self, region: &str) -> Result<Option<BTreeSet<u32>>, Self::Error>;
}
