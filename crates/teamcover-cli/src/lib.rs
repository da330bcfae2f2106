//! Teamcover CLI library.
//!
//! This library provides the core functionality for the Teamcover command-line interface,
//! including settings management, catalog preparation, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::Settings;
pub use error::{CliError, Result};
pub use output::Formatter;
