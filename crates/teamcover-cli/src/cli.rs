//! CLI command definitions and argument parsing.

use crate::config::Settings;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Teamcover - Find fixed-size teams with the widest matchup coverage.
#[derive(Debug, Parser)]
#[command(name = "teamcover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Settings file path (default: ~/.teamcover/settings.toml)
    #[arg(short, long, global = true, env = "TEAMCOVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding pokedex.csv and the region files
    #[arg(short, long, global = true, env = "TEAMCOVER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (member names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for the best teams
    Search(SearchArgs),

    /// List attribute keys by profile score
    Rank(RankArgs),

    /// Show how the best team fares against one catalog item
    Matchup(MatchupArgs),
}

/// Catalog selection and reduction flags shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct DexArgs {
    /// Dex to analyze: `national`, `hypothetical` or one or more region names
    #[arg(long, num_args = 1..)]
    pub dex: Vec<String>,

    /// Drop items below this strength
    #[arg(long)]
    pub min_strength: Option<u32>,

    /// Keep only keys scoring at least the K-th best profile score
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Keep keys with a quadruple weakness
    #[arg(long)]
    pub keep_quad_weak: bool,

    /// Exclude items whose name contains this pattern (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Always seat the item matching this name pattern (repeatable)
    #[arg(long = "force")]
    pub force: Vec<String>,

    /// Consider hidden abilities when expanding modifiers
    #[arg(long)]
    pub hidden_abilities: bool,

    /// Skip ability expansion entirely
    #[arg(long)]
    pub no_modifiers: bool,

    /// Keep mega forms
    #[arg(long)]
    pub include_megas: bool,
}

impl DexArgs {
    /// Override `settings` with the flags given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(min_strength) = self.min_strength {
            settings.min_strength = min_strength;
        }
        if let Some(top_k) = self.top_k {
            settings.top_k_types_to_keep = top_k;
        }
        if self.keep_quad_weak {
            settings.exclude_quad_weak = false;
        }
        settings.exclude_name_patterns.extend(self.exclude.iter().cloned());
        settings
            .forced_member_name_patterns
            .extend(self.force.iter().cloned());
        if self.hidden_abilities {
            settings.assess_hidden_modifier_variant = true;
        }
        if self.no_modifiers {
            settings.assess_modifiers = false;
        }
        if self.include_megas {
            settings.exclude_mega_evolutions = false;
        }
    }
}

/// Search tuning flags.
#[derive(Debug, Clone, Default, Args)]
pub struct TeamArgs {
    /// Members per team
    #[arg(short = 'n', long)]
    pub team_size: Option<usize>,

    /// Report teams within this coverage distance of the best
    #[arg(short, long)]
    pub margin: Option<usize>,

    /// Stop searching after this many seconds
    #[arg(short, long)]
    pub time_limit: Option<u64>,

    /// Worker threads (0 = one per core, 1 = sequential)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl TeamArgs {
    /// Override `settings` with the flags given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(team_size) = self.team_size {
            settings.team_size = team_size;
        }
        if let Some(margin) = self.margin {
            settings.report_margin = margin;
        }
        if let Some(time_limit) = self.time_limit {
            settings.time_limit_secs = Some(time_limit);
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
    }
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub dex: DexArgs,

    #[command(flatten)]
    pub team: TeamArgs,

    /// Maximum number of teams to print
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the rank command.
#[derive(Debug, Parser)]
pub struct RankArgs {
    #[command(flatten)]
    pub dex: DexArgs,

    /// Maximum number of keys to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the matchup command.
#[derive(Debug, Parser)]
pub struct MatchupArgs {
    /// Name (or name fragment) of the opposing item
    pub name: String,

    #[command(flatten)]
    pub dex: DexArgs,

    #[command(flatten)]
    pub team: TeamArgs,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from([
            "teamcover",
            "search",
            "--dex",
            "gen1_kanto",
            "gen2_johto",
            "-n",
            "4",
            "--force",
            "Lapras",
        ]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.dex.dex, vec!["gen1_kanto", "gen2_johto"]);
                assert_eq!(args.team.team_size, Some(4));
                assert_eq!(args.dex.force, vec!["Lapras"]);
                assert_eq!(args.limit, 10);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["teamcover", "rank", "-vv", "--format", "json", "--no-color"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Command::Rank(_)));
    }

    #[test]
    fn test_matchup_command() {
        let cli = Cli::parse_from(["teamcover", "matchup", "Garchomp", "--threads", "1"]);
        match cli.command {
            Command::Matchup(args) => {
                assert_eq!(args.name, "Garchomp");
                assert_eq!(args.team.threads, Some(1));
            }
            _ => panic!("Expected Matchup command"),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let mut settings = Settings {
            exclude_name_patterns: vec!["Ditto".to_string()],
            ..Settings::default()
        };
        let dex = DexArgs {
            min_strength: Some(450),
            keep_quad_weak: true,
            exclude: vec!["Shedinja".to_string()],
            ..DexArgs::default()
        };
        let team = TeamArgs {
            team_size: Some(3),
            ..TeamArgs::default()
        };
        dex.apply(&mut settings);
        team.apply(&mut settings);

        assert_eq!(settings.min_strength, 450);
        assert!(!settings.exclude_quad_weak);
        assert_eq!(settings.exclude_name_patterns, vec!["Ditto", "Shedinja"]);
        assert_eq!(settings.team_size, 3);
        assert_eq!(settings.report_margin, 1);
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, crate::config::OutputFormat::Quiet);
    }
}
