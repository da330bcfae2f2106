//! Load, select, derive and reduce the catalog for a command.

use crate::config::Settings;
use crate::error::Result;
use std::collections::HashMap;
use teamcover_catalog::{expand, select, CsvCatalog, DexSelection};
use teamcover_domain::{AttributeTable, CatalogSource, Item, ItemId};
use teamcover_engine::{
    derive, reduce, resolve, search, Derivation, ForcedResolution, Reduction, SearchOutcome,
};
use tracing::info;

/// Everything a command needs after the catalog has been prepared.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// The full expanded catalog, keyed the way derivation keyed it
    pub catalog: Vec<Item>,
    /// Profiles of the selected items
    pub derivation: Derivation,
    /// The reduced candidate pool
    pub reduction: Reduction,
    /// Forced members resolved against the full catalog
    pub forced: ForcedResolution,
    /// Non-fatal problems found while selecting the dex
    pub warnings: Vec<String>,
}

impl Prepared {
    /// Every warning collected while preparing, selection first.
    pub fn all_warnings(&self) -> impl Iterator<Item = &String> {
        self.warnings.iter().chain(self.forced.warnings.iter())
    }
}

/// Load the catalog from `settings.data_dir` and prepare it for searching.
pub fn prepare(settings: &Settings, dex: &DexSelection) -> Result<Prepared> {
    let source = CsvCatalog::new(&settings.data_dir);
    let records = source.load_records()?;
    let catalog = expand(&records, &settings.expansion_options());

    let selection = select(&catalog, dex, &source, &settings.selection_options())?;

    let table = AttributeTable::standard();
    let derivation = derive(&selection.items, &table);
    info!(
        items = derivation.items.len(),
        keys = derivation.profiles.len(),
        normalized = derivation.normalized,
        "Derived profiles"
    );

    let reduction = reduce(
        &derivation.items,
        &derivation.profiles,
        &table,
        &settings.reduce_policy(),
    )?;
    info!("{}", reduction.report.summary());

    let catalog = normalize_catalog(catalog, &derivation.items);
    let forced = resolve(
        &settings.forced_member_name_patterns,
        &catalog,
        &reduction.pool,
        &derivation.profiles,
    );

    Ok(Prepared {
        catalog,
        derivation,
        reduction,
        forced,
        warnings: selection.warnings,
    })
}

/// Carry derivation's rekeying over to the full catalog
fn normalize_catalog(catalog: Vec<Item>, derived: &[Item]) -> Vec<Item> {
    let derived: HashMap<ItemId, &Item> = derived.iter().map(|item| (item.id, item)).collect();
    catalog
        .into_iter()
        .map(|item| match derived.get(&item.id) {
            Some(rekeyed) => (*rekeyed).clone(),
            None => item,
        })
        .collect()
}

/// Search the prepared pool with the configured options.
pub fn run_search(prepared: &Prepared, settings: &Settings) -> Result<SearchOutcome> {
    let outcome = search(
        &prepared.reduction.pool,
        &prepared.forced.members,
        &prepared.derivation.profiles,
        &settings.search_options(),
    )?;
    Ok(outcome)
}
