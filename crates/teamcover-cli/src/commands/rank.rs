//! Rank command implementation.

use crate::cli::RankArgs;
use crate::commands::print_warnings;
use crate::config::Settings;
use crate::error::Result;
use crate::output::{Formatter, RankRow};
use crate::pipeline::{self, Prepared};
use std::collections::BTreeMap;
use teamcover_catalog::DexSelection;
use teamcover_domain::AttributeKey;

/// Execute the rank command.
pub fn execute_rank(args: RankArgs, mut settings: Settings, formatter: &Formatter) -> Result<()> {
    args.dex.apply(&mut settings);

    let dex = DexSelection::from_selectors(&args.dex.dex);
    let prepared = pipeline::prepare(&settings, &dex)?;
    print_warnings(&prepared, formatter);

    let mut rows = rank_rows(&prepared);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    println!("{}", formatter.format_rank(&rows)?);
    Ok(())
}

/// Every profiled key with its score, best first.
pub fn rank_rows(prepared: &Prepared) -> Vec<RankRow> {
    let mut items: BTreeMap<&AttributeKey, Vec<String>> = BTreeMap::new();
    for item in &prepared.derivation.items {
        items.entry(&item.key).or_default().push(item.name.clone());
    }

    let mut rows: Vec<RankRow> = prepared
        .derivation
        .profiles
        .iter()
        .map(|profile| RankRow {
            key: profile.key.to_string(),
            score: profile.score,
            average: profile.average(),
            items: items.get(&profile.key).cloned().unwrap_or_default(),
        })
        .collect();

    // Profiles iterate in key order, so ties stay in key order
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows
}
