//! Settings management for the CLI.
//!
//! Settings resolve in three layers: built-in defaults, then the settings
//! file, then command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use teamcover_catalog::{ExpansionOptions, SelectionOptions};
use teamcover_engine::{ReducePolicy, SearchOptions};
use tracing::debug;

/// Analysis and output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Items below this strength are dropped; also the strength of synthetic items
    #[serde(default)]
    pub min_strength: u32,

    /// Keep only keys whose profile score reaches the K-th best (0 = keep all)
    #[serde(default)]
    pub top_k_types_to_keep: usize,

    /// Drop keys with a quadruple weakness
    #[serde(default = "default_true")]
    pub exclude_quad_weak: bool,

    /// Catalog numbers never considered for a team
    #[serde(default)]
    pub exclude_ids: Vec<u32>,

    /// Name substrings never considered for a team
    #[serde(default)]
    pub exclude_name_patterns: Vec<String>,

    /// Name substrings always seated in the team
    #[serde(default)]
    pub forced_member_name_patterns: Vec<String>,

    /// Expand abilities into modifier variants
    #[serde(default = "default_true")]
    pub assess_modifiers: bool,

    /// Consider hidden abilities during expansion
    #[serde(default)]
    pub assess_hidden_modifier_variant: bool,

    /// Drop mega forms from national and regional selections
    #[serde(default = "default_true")]
    pub exclude_mega_evolutions: bool,

    /// Members per team
    #[serde(default = "default_team_size")]
    pub team_size: usize,

    /// Report teams within this coverage distance of the best
    #[serde(default = "default_report_margin")]
    pub report_margin: usize,

    /// Search worker threads (0 = one per core)
    #[serde(default)]
    pub threads: usize,

    /// Stop the search after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_secs: Option<u64>,

    /// Directory holding the catalog files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Settings {
    /// Default settings file path (`~/.teamcover/settings.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".teamcover").join("settings.toml"))
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `explicit`, or from the default path when it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file falls back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "Settings file {} does not exist",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "Loading settings");
            return Self::from_file(path);
        }

        match Self::default_path() {
            Ok(path) if path.is_file() => {
                debug!(path = %path.display(), "Loading settings");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject values no search can run with.
    pub fn validate(&self) -> Result<()> {
        if self.team_size == 0 {
            return Err(CliError::Config("team_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Reduction stages configured by these settings.
    pub fn reduce_policy(&self) -> ReducePolicy {
        ReducePolicy {
            min_strength: self.min_strength,
            top_k_types_to_keep: self.top_k_types_to_keep,
            exclude_quad_weak: self.exclude_quad_weak,
            exclude_ids: self.exclude_ids.clone(),
            exclude_name_patterns: self.exclude_name_patterns.clone(),
        }
    }

    /// Ability expansion configured by these settings.
    pub fn expansion_options(&self) -> ExpansionOptions {
        ExpansionOptions {
            assess_modifiers: self.assess_modifiers,
            include_hidden: self.assess_hidden_modifier_variant,
        }
    }

    /// Dex selection configured by these settings.
    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            exclude_megas: self.exclude_mega_evolutions,
            strength_floor: self.min_strength,
        }
    }

    /// Search tuning configured by these settings.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            team_size: self.team_size,
            margin: self.report_margin,
            parallel: self.threads != 1,
            threads: self.threads,
            time_limit: self.time_limit_secs.map(Duration::from_secs),
            cancel: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_strength: 0,
            top_k_types_to_keep: 0,
            exclude_quad_weak: true,
            exclude_ids: Vec::new(),
            exclude_name_patterns: Vec::new(),
            forced_member_name_patterns: Vec::new(),
            assess_modifiers: true,
            assess_hidden_modifier_variant: false,
            exclude_mega_evolutions: true,
            team_size: default_team_size(),
            report_margin: default_report_margin(),
            threads: 0,
            time_limit_secs: None,
            data_dir: default_data_dir(),
            color: true,
            format: default_format(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_team_size() -> usize {
    6
}

fn default_report_margin() -> usize {
    1
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
