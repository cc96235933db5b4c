//! Enrichment boundary.
//!
//! `CommandEnricher` delegates explanations to an external program;
//! `TimeoutEnricher` bounds how long any enricher may take per change.
//! `from_config` assembles the enricher a command run should use.

pub mod command;
pub mod timeout;

pub use command::{excerpt, CommandEnricher, EnrichmentRequest, API_KEY_ENV};
pub use timeout::TimeoutEnricher;

use regwatch_core::config::EnrichmentConfig;
use regwatch_core::report::NoEnricher;
use regwatch_core::Enricher;
use std::sync::Arc;
use std::time::Duration;

/// The configured enricher: the external command behind a timeout, or
/// `NoEnricher` when no command is configured.
pub fn from_config(config: &EnrichmentConfig) -> Arc<dyn Enricher> {
    match CommandEnricher::from_config(config) {
        Some(command) => Arc::new(TimeoutEnricher::new(
            Arc::new(command),
            Duration::from_millis(config.timeout_ms),
        )),
        None => Arc::new(NoEnricher),
    }
}
