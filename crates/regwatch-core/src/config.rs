//! Configuration file support.
//!
//! A single TOML file; every section and key is optional and falls back to
//! its default.
//!
//! ```toml
//! [diff]
//! threshold = 0.95
//! granularity = "words"
//!
//! [report]
//! max_diff_lines = 20
//! context_lines = 3
//!
//! [enrichment]
//! command = ["/usr/local/bin/explain-change"]
//! timeout_ms = 30000
//!
//! [store]
//! db_path = ".regwatch/store.db"
//!
//! [retention]
//! days_to_keep = 30
//!
//! [logging]
//! profile = "production"
//! ```

use crate::diff::DiffOptions;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::logging_facility::Profile;
use crate::report::ReportOptions;
use regwatch_core_types::Sensitive;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = ".regwatch/store.db";

/// External enrichment program settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Program and arguments; empty disables enrichment
    pub command: Vec<String>,
    /// Per-change wait before the change falls back to its summary
    pub timeout_ms: u64,
    /// Section content is cut to this many characters in the prompt
    pub max_excerpt_chars: usize,
    /// Handed to the program's environment, never logged
    pub api_key: Option<Sensitive<String>>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_ms: 30_000,
            max_excerpt_chars: 1000,
            api_key: None,
        }
    }
}

impl EnrichmentConfig {
    pub fn is_enabled(&self) -> bool {
        !self.command.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    pub days_to_keep: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { days_to_keep: 30 }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub profile: Profile,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegwatchConfig {
    pub diff: DiffOptions,
    pub report: ReportOptions,
    pub enrichment: EnrichmentConfig,
    pub store: StoreConfig,
    pub retention: RetentionConfig,
    pub logging: LoggingConfig,
}

impl RegwatchConfig {
    /// Parse configuration text and validate it.
    ///
    /// # Errors
    ///
    /// `Config` for malformed TOML or out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RegwatchConfig = toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it does not parse or
    /// validate.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_entity_id(path.display().to_string())
                .with_message(e.to_string())
        })?;
        Self::from_toml_str(&text).map_err(|e| e.with_entity_id(path.display().to_string()))
    }

    /// Load from `path` when given and present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// As [`RegwatchConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values no component could work with.
    ///
    /// # Errors
    ///
    /// `Config` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.diff.validate() {
            return Err(config_error("diff.threshold", e.to_string()));
        }
        if self.report.max_diff_lines == 0 {
            return Err(config_error("report.max_diff_lines", "must be at least 1"));
        }
        if self.enrichment.timeout_ms == 0 {
            return Err(config_error("enrichment.timeout_ms", "must be at least 1"));
        }
        if self.enrichment.max_excerpt_chars == 0 {
            return Err(config_error(
                "enrichment.max_excerpt_chars",
                "must be at least 1",
            ));
        }
        if self.retention.days_to_keep == 0 {
            return Err(config_error("retention.days_to_keep", "must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(key: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("validate_config")
        .with_entity_id(key)
        .with_message(message)
}
