//! Matchup command implementation.

use crate::cli::MatchupArgs;
use crate::commands::print_warnings;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::output::{Formatter, MatchupRow, MatchupView};
use crate::pipeline::{self, Prepared};
use teamcover_catalog::DexSelection;
use teamcover_domain::{Classification, Item};
use teamcover_engine::{forced, scorer, Team};

/// Execute the matchup command.
pub fn execute_matchup(args: MatchupArgs, mut settings: Settings, formatter: &Formatter) -> Result<()> {
    args.dex.apply(&mut settings);
    args.team.apply(&mut settings);
    settings.validate()?;

    let dex = DexSelection::from_selectors(&args.dex.dex);
    let prepared = pipeline::prepare(&settings, &dex)?;
    print_warnings(&prepared, formatter);

    let opponent = find_opponent(&prepared, &args.name)?;
    let outcome = pipeline::run_search(&prepared, &settings)?;
    let best = outcome
        .best_team()
        .ok_or_else(|| CliError::InvalidInput("The search found no team".to_string()))?;

    let view = build_view(&prepared, best, &opponent);
    println!("{}", formatter.format_matchup(&view)?);
    Ok(())
}

/// Find the opposing item; its key must be profiled.
pub fn find_opponent(prepared: &Prepared, name: &str) -> Result<Item> {
    let mut warnings = Vec::new();
    let found = forced::find_item(name, &prepared.catalog, &mut warnings)
        .ok_or_else(|| CliError::InvalidInput(format!("No item matches '{}'", name)))?;

    if prepared.derivation.profiles.get(&found.key).is_none() {
        return Err(CliError::InvalidInput(format!(
            "{} is not part of the selected dex",
            found.name
        )));
    }
    Ok(found.clone())
}

/// How each member of `team` fares against `opponent`.
pub fn build_view(prepared: &Prepared, team: &Team, opponent: &Item) -> MatchupView {
    let rows = scorer::matchups_against(&team.members, &opponent.key, &prepared.derivation.profiles)
        .into_iter()
        .map(|(member, matchup)| MatchupRow {
            member: member.name.clone(),
            key: member.key.to_string(),
            offense: matchup.map(|m| m.offense.to_string()),
            defense: matchup.map(|m| m.defense.to_string()),
            value: matchup.map(|m| m.value()),
            classification: matchup.map(|m| classification_label(m.classification()).to_string()),
        })
        .collect();

    MatchupView {
        opponent: opponent.name.clone(),
        opponent_key: opponent.key.to_string(),
        rows,
    }
}

fn classification_label(classification: Classification) -> &'static str {
    match classification {
        Classification::SafeSuperStab => "decisive",
        Classification::ResistStab => "fallback",
        Classification::Neutral => "neutral",
        Classification::Unfavorable => "unfavorable",
    }
}
