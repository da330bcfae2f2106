//! Teamcover CLI - Find fixed-size teams with the widest matchup coverage.

use clap::Parser;
use teamcover_cli::commands;
use teamcover_cli::{Cli, Command, Formatter, Settings};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> teamcover_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }

    let format = cli.format.map(Into::into).unwrap_or(settings.format);
    let color_enabled = !cli.no_color && settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Search(args) => commands::execute_search(args, settings, &formatter)?,
        Command::Rank(args) => commands::execute_rank(args, settings, &formatter)?,
        Command::Matchup(args) => commands::execute_matchup(args, settings, &formatter)?,
    }

    Ok(())
}

/// Log to stderr; `-v` flags win over `RUST_LOG`, which wins over `warn`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
