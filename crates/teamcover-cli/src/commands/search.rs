//! Search command implementation.

use crate::cli::SearchArgs;
use crate::commands::print_warnings;
use crate::config::Settings;
use crate::error::Result;
use crate::output::{Formatter, MemberView, SearchView, TeamView};
use crate::pipeline::{self, Prepared};
use teamcover_catalog::DexSelection;
use teamcover_engine::{scorer, SearchOutcome};

/// Execute the search command.
pub fn execute_search(args: SearchArgs, mut settings: Settings, formatter: &Formatter) -> Result<()> {
    args.dex.apply(&mut settings);
    args.team.apply(&mut settings);
    settings.validate()?;

    let dex = DexSelection::from_selectors(&args.dex.dex);
    let prepared = pipeline::prepare(&settings, &dex)?;
    print_warnings(&prepared, formatter);

    let outcome = pipeline::run_search(&prepared, &settings)?;
    let view = build_view(&prepared, &outcome, &dex, args.limit);
    println!("{}", formatter.format_search(&view)?);
    Ok(())
}

/// Turn a search outcome into its printable form.
pub fn build_view(
    prepared: &Prepared,
    outcome: &SearchOutcome,
    dex: &DexSelection,
    limit: usize,
) -> SearchView {
    let profiles = &prepared.derivation.profiles;

    let teams = outcome
        .results
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, team)| {
            let report = scorer::report(&team.members, profiles);
            TeamView {
                rank: index + 1,
                coverage: report.score.coverage,
                fallback: report.score.fallback,
                favorable_redundancy: report.score.favorable_redundancy,
                decisive_redundancy: report.score.decisive_redundancy,
                fallback_redundancy: report.score.fallback_redundancy,
                total_score: report.score.total_score,
                identity_sum: report.identity_sum,
                members: report
                    .members
                    .into_iter()
                    .map(|m| MemberView {
                        alternates: prepared
                            .reduction
                            .alternates
                            .get(&m.item.key)
                            .cloned()
                            .unwrap_or_default(),
                        name: m.item.name,
                        number: m.item.number,
                        key: m.item.key.to_string(),
                        strength: m.item.strength,
                        profile_score: m.profile_score,
                        ability: m.item.variant,
                    })
                    .collect(),
            }
        })
        .collect();

    let (bad, neutral, resist_only) = match outcome.best_team() {
        Some(best) => {
            let report = scorer::report(&best.members, profiles);
            let names = |keys: Vec<teamcover_domain::AttributeKey>| {
                keys.iter().map(|k| k.to_string()).collect::<Vec<_>>()
            };
            (
                names(report.bad),
                names(report.neutral),
                names(report.resist_only),
            )
        }
        None => (Vec::new(), Vec::new(), Vec::new()),
    };

    SearchView {
        dex: dex.to_string(),
        complete: outcome.complete,
        reduction: prepared.reduction.report.clone(),
        stats: outcome.stats,
        teams,
        bad,
        neutral,
        resist_only,
        warnings: prepared.all_warnings().cloned().collect(),
    }
}
