//! Subcommand implementations and their shared context.

pub mod capture;
pub mod captures;
pub mod compare;
pub mod history;
pub mod prune;
pub mod stats;

use clap::ValueEnum;
use regwatch_core::RegwatchConfig;
use regwatch_store::SqliteSnapshotStore;
use serde::Serialize;
use std::path::PathBuf;

/// Document compared when `--document` is not given
pub const DEFAULT_DOCUMENT: &str = "far";

/// Loaded configuration plus the resolved database location.
pub struct Context {
    pub config: RegwatchConfig,
    pub db_path: PathBuf,
}

impl Context {
    pub fn new(config: RegwatchConfig, db_override: Option<PathBuf>) -> Self {
        let db_path = db_override.unwrap_or_else(|| config.store.db_path.clone());
        Self { config, db_path }
    }

    pub fn open_store(&self) -> Result<SqliteSnapshotStore, Box<dyn std::error::Error>> {
        Ok(SqliteSnapshotStore::open(&self.db_path)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
