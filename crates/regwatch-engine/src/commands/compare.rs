//! Comparison orchestration.
//!
//! ## Pipeline
//! 1. Resolve the pair to compare (latest pair, or two explicit ids)
//! 2. Diff with the configured threshold and granularity
//! 3. Short-circuit to `NoChanges` when the change set is empty
//! 4. Build the structured report, enriching each change independently
//!
//! Absence (no history, a single version) is an outcome, not an error.

#![allow(clippy::result_large_err)]

use regwatch_core::errors::{ExError, ExErrorKind, RegwatchError, Result};
use regwatch_core::{
    build_report, diff, log_op_end, log_op_error, log_op_start, ChangeSet, ComparisonPair,
    Enricher, RegwatchConfig, Snapshot, SnapshotStore, StructuredReport,
};
use serde::Serialize;
use std::time::Instant;

/// Outcome of comparing two versions of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Comparison {
    /// Nothing has been captured for the document
    NoHistory,
    /// Only one distinct version exists
    SingleVersion(Snapshot),
    /// Content differs but no section crossed the threshold
    NoChanges(ChangeSet),
    /// At least one significant change
    Changed(StructuredReport),
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::NoHistory => "no_history",
            Comparison::SingleVersion(_) => "single_version",
            Comparison::NoChanges(_) => "no_changes",
            Comparison::Changed(_) => "changed",
        }
    }

    /// The report, when there is one
    pub fn report(&self) -> Option<&StructuredReport> {
        match self {
            Comparison::Changed(report) => Some(report),
            _ => None,
        }
    }
}

/// Diff two snapshots and report on the result.
///
/// # Errors
///
/// `DocumentMismatch` or `InvalidThreshold` from the diff engine.
pub fn compare_pair(
    previous: &Snapshot,
    latest: &Snapshot,
    config: &RegwatchConfig,
    enricher: &dyn Enricher,
) -> Result<Comparison> {
    let change_set = diff(previous, latest, &config.diff)?;
    if change_set.is_empty() {
        return Ok(Comparison::NoChanges(change_set));
    }
    Ok(Comparison::Changed(build_report(
        &change_set,
        enricher,
        &config.report,
    )))
}

/// Compare the latest version of a document with the previous distinct one.
///
/// # Errors
///
/// Store read failures, or diff validation errors.
pub fn compare_latest(
    store: &dyn SnapshotStore,
    document_id: &str,
    config: &RegwatchConfig,
    enricher: &dyn Enricher,
) -> Result<Comparison> {
    let start = Instant::now();
    log_op_start!("compare_latest", document_id = %document_id);

    let result = store
        .comparison_pair(document_id)
        .and_then(|pair| match pair {
            ComparisonPair::NoHistory => Ok(Comparison::NoHistory),
            ComparisonPair::SingleVersion(snapshot) => Ok(Comparison::SingleVersion(snapshot)),
            ComparisonPair::Ready { previous, latest } => {
                compare_pair(&previous, &latest, config, enricher)
            }
        });

    finish("compare_latest", start, result)
}

/// Compare two explicit entries of a document's history.
///
/// `from_id` is treated as the old version and `to_id` as the new one,
/// whatever their capture order.
///
/// # Errors
///
/// - `NotFound` when either id is unknown or belongs to another document
/// - diff validation errors
pub fn compare_snapshots(
    store: &dyn SnapshotStore,
    document_id: &str,
    from_id: &str,
    to_id: &str,
    config: &RegwatchConfig,
    enricher: &dyn Enricher,
) -> Result<Comparison> {
    let start = Instant::now();
    log_op_start!(
        "compare_snapshots",
        document_id = %document_id,
        from = %from_id,
        to = %to_id
    );

    let result = fetch(store, document_id, from_id).and_then(|from| {
        let to = fetch(store, document_id, to_id)?;
        compare_pair(&from, &to, config, enricher)
    });

    finish("compare_snapshots", start, result)
}

fn fetch(store: &dyn SnapshotStore, document_id: &str, snapshot_id: &str) -> Result<Snapshot> {
    match store.get(snapshot_id)? {
        Some(snapshot) if snapshot.document_id == document_id => Ok(snapshot),
        Some(snapshot) => Err(ExError::new(ExErrorKind::NotFound)
            .with_op("compare_snapshots")
            .with_entity_id(snapshot_id)
            .with_message(format!(
                "Snapshot {} belongs to document {}, not {}",
                snapshot_id, snapshot.document_id, document_id
            ))),
        None => Err(ExError::from(RegwatchError::SnapshotNotFound {
            snapshot_id: snapshot_id.to_string(),
        })
        .with_op("compare_snapshots")),
    }
}

fn finish(op: &'static str, start: Instant, result: Result<Comparison>) -> Result<Comparison> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(comparison) => {
            log_op_end!(op, duration_ms = duration_ms, outcome = comparison.as_str());
        }
        Err(e) => {
            log_op_error!(op, e.clone(), duration_ms = duration_ms);
        }
    }
    result
}
