//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde::Serialize;
use teamcover_engine::{ReductionReport, SearchStats};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// One team member as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    /// Display name
    pub name: String,
    /// Catalog number
    pub number: u32,
    /// Attribute key
    pub key: String,
    /// Strength value
    pub strength: u32,
    /// Profile score of the key, absent when unprofiled
    pub profile_score: Option<i32>,
    /// Ability the key's modifiers come from
    pub ability: Option<String>,
    /// Weaker items sharing the member's key
    pub alternates: Vec<String>,
}

/// One reported team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    /// 1-based position, best first
    pub rank: usize,
    /// Opposing keys hit decisively
    pub coverage: usize,
    /// Opposing keys handled only by resisting
    pub fallback: usize,
    /// Members handling the least-covered favorable key
    pub favorable_redundancy: usize,
    /// Members handling the least-covered decisive key
    pub decisive_redundancy: usize,
    /// Members handling the least-covered fallback key
    pub fallback_redundancy: usize,
    /// Sum of member profile scores
    pub total_score: i64,
    /// Sum of member catalog numbers
    pub identity_sum: u64,
    /// Members, ordered by name
    pub members: Vec<MemberView>,
}

/// Result of the search command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    /// Dex being searched
    pub dex: String,
    /// False when the search hit its time limit
    pub complete: bool,
    /// Items removed by each reduction stage
    pub reduction: ReductionReport,
    /// Search counters
    pub stats: SearchStats,
    /// Teams within the report margin, best first
    pub teams: Vec<TeamView>,
    /// Opposing keys the best team handles badly
    pub bad: Vec<String>,
    /// Opposing keys the best team handles only neutrally
    pub neutral: Vec<String>,
    /// Opposing keys the best team only resists
    pub resist_only: Vec<String>,
    /// Recoverable problems met along the way
    pub warnings: Vec<String>,
}

/// One line of the rank command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    /// Attribute key
    pub key: String,
    /// Profile score
    pub score: i32,
    /// Average matchup value
    pub average: f64,
    /// Selected items carrying the key
    pub items: Vec<String>,
}

/// One member line of the matchup command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupRow {
    /// Member name
    pub member: String,
    /// Member key
    pub key: String,
    /// How the member's attacks fare
    pub offense: Option<String>,
    /// How the member holds up
    pub defense: Option<String>,
    /// Matchup value
    pub value: Option<i32>,
    /// Search-relevant bucket
    pub classification: Option<String>,
}

/// Result of the matchup command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupView {
    /// Opposing item name
    pub opponent: String,
    /// Opposing item key
    pub opponent_key: String,
    /// One row per member of the best team
    pub rows: Vec<MatchupRow>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format search results.
    pub fn format_search(&self, view: &SearchView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Table => Ok(self.format_search_table(view)),
            OutputFormat::Quiet => Ok(view
                .teams
                .iter()
                .map(|t| {
                    t.members
                        .iter()
                        .map(|m| m.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_search_table(&self, view: &SearchView) -> String {
        let mut out = Vec::new();

        if view.teams.is_empty() {
            out.push(self.colorize("No teams found.", "yellow"));
            return out.join("\n");
        }

        out.push(format!(
            "{} {} ({} of {} items kept)",
            self.colorize("Dex:", "cyan"),
            view.dex,
            view.reduction.remaining,
            view.reduction.initial
        ));
        out.push(format!(
            "{} {} nodes, {} scored, {} padded",
            self.colorize("Search:", "cyan"),
            view.stats.nodes,
            view.stats.scored,
            view.stats.padded
        ));
        if !view.complete {
            out.push(self.warning("Time limit reached; results may not be optimal"));
        }

        for team in &view.teams {
            out.push(String::new());
            out.push(self.colorize(
                &format!(
                    "Team {}: coverage {}, fallback {}, redundancy {}/{}/{}, score {}, identity {}",
                    team.rank,
                    team.coverage,
                    team.fallback,
                    team.favorable_redundancy,
                    team.decisive_redundancy,
                    team.fallback_redundancy,
                    team.total_score,
                    team.identity_sum
                ),
                "green",
            ));

            let mut builder = Builder::default();
            builder.push_record(["Name", "No.", "Key", "Strength", "Score", "Ability", "Alternates"]);
            for member in &team.members {
                builder.push_record([
                    member.name.clone(),
                    member.number.to_string(),
                    member.key.clone(),
                    member.strength.to_string(),
                    member
                        .profile_score
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    member.ability.clone().unwrap_or_default(),
                    member.alternates.join(", "),
                ]);
            }
            out.push(Self::render(builder));
        }

        out.push(String::new());
        out.push(self.key_list("Handled badly by the best team", &view.bad, "red"));
        out.push(self.key_list("Handled only neutrally", &view.neutral, "yellow"));
        out.push(self.key_list("Resisted but never hit decisively", &view.resist_only, "blue"));

        out.join("\n")
    }

    fn key_list(&self, label: &str, keys: &[String], color: &str) -> String {
        let body = if keys.is_empty() {
            "none".to_string()
        } else {
            keys.join(" ")
        };
        format!("{} ({}): {}", self.colorize(label, color), keys.len(), body)
    }

    /// Format the key ranking.
    pub fn format_rank(&self, rows: &[RankRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Quiet => Ok(rows
                .iter()
                .map(|r| r.key.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if rows.is_empty() {
                    return Ok(self.colorize("No keys found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Key", "Score", "Average", "Items"]);
                for row in rows {
                    builder.push_record([
                        row.key.clone(),
                        row.score.to_string(),
                        format!("{:.3}", row.average),
                        row.items.join(", "),
                    ]);
                }
                Ok(Self::render(builder))
            }
        }
    }

    /// Format how the best team fares against one opponent.
    pub fn format_matchup(&self, view: &MatchupView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Quiet => Ok(view
                .rows
                .iter()
                .map(|r| {
                    format!(
                        "{} {}",
                        r.member,
                        r.value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Member", "Key", "Offense", "Defense", "Value", "Class"]);
                for row in &view.rows {
                    let dash = || "-".to_string();
                    builder.push_record([
                        row.member.clone(),
                        row.key.clone(),
                        row.offense.clone().unwrap_or_else(dash),
                        row.defense.clone().unwrap_or_else(dash),
                        row.value.map(|v| v.to_string()).unwrap_or_else(dash),
                        row.classification.clone().unwrap_or_else(dash),
                    ]);
                }
                Ok(format!(
                    "{} {} {}\n{}",
                    self.colorize("Best team against", "cyan"),
                    view.opponent,
                    view.opponent_key,
                    Self::render(builder)
                ))
            }
        }
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// One-line reduction summary for table output, nothing otherwise.
    pub fn reduction_note(&self, report: &ReductionReport) -> Option<String> {
        if self.format != OutputFormat::Table {
            return None;
        }
        Some(self.info(&format!(
            "Reduced {} items to {} ({} excluded, {} weaker duplicates, {} dominated)",
            report.initial,
            report.remaining,
            report.excluded + report.below_strength,
            report.duplicate_keys,
            report.dominated
        )))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
