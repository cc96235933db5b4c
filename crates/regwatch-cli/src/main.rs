//! Regwatch CLI
//!
//! Command-line interface for capturing regulation versions and reporting
//! on what changed between them.

use clap::{Parser, Subcommand};
use regwatch_core::logging_facility;
use regwatch_core::RegwatchConfig;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "regwatch")]
#[command(about = "Regwatch - regulation snapshot history and change reports", long_about = None)]
struct Cli {
    /// Configuration file; built-in defaults apply when it does not exist
    #[arg(long, global = true, default_value = "regwatch.toml")]
    config: PathBuf,

    /// SQLite database path (overrides store.db_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Record a fetched document version and report changes
    Capture(commands::capture::CaptureArgs),
    /// Compare the latest version with the previous one, or two snapshots
    Compare(commands::compare::CompareArgs),
    /// List the stored versions of a document
    History(commands::history::HistoryArgs),
    /// List capture log entries, newest first
    Captures(commands::captures::CapturesArgs),
    /// Delete old non-latest snapshots
    Prune(commands::prune::PruneArgs),
    /// Show store statistics
    Stats(commands::stats::StatsArgs),
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = RegwatchConfig::load_or_default(Some(cli.config.as_path()))?;
    logging_facility::init(config.logging.profile);
    let ctx = commands::Context::new(config, cli.db);

    match cli.command {
        Commands::Capture(args) => commands::capture::execute(&ctx, args),
        Commands::Compare(args) => commands::compare::execute(&ctx, args),
        Commands::History(args) => commands::history::execute(&ctx, args),
        Commands::Captures(args) => commands::captures::execute(&ctx, args),
        Commands::Prune(args) => commands::prune::execute(&ctx, args),
        Commands::Stats(args) => commands::stats::execute(&ctx, args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
