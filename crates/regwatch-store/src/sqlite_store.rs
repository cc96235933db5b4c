//! SQLite-backed `SnapshotStore`.
//!
//! One connection behind a `Mutex` serializes calls within a process; the
//! `IMMEDIATE` transaction in `record_capture` serializes writers across
//! processes sharing the database file.

#![allow(clippy::result_large_err)]

use crate::captures::{list_captures, CaptureEntry};
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::retention::{prune_before, PruneReport};
use crate::snapshot::persist::record_capture;
use crate::snapshot::query::{
    into_snapshot, latest_snapshot_id, list_snapshot_rows, load_snapshot,
    previous_distinct_snapshot_id,
};
use crate::stats::{store_stats, StoreStats};
use regwatch_core::errors::{ExError, ExErrorKind};
use regwatch_core::{
    log_op_end, log_op_error, log_op_start, Capture, ComparisonPair, RecordOutcome, Snapshot,
    SnapshotStore, SnapshotSummary,
};
use regwatch_core_types::RequestId;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Durable snapshot history in a single SQLite database.
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Open (creating if needed) the database at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// `Io` if the parent directory cannot be created, `Persistence` for
    /// SQLite or migration failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// Fresh in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// `Persistence` for SQLite or migration failures.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure and migrate an already open connection.
    ///
    /// # Errors
    ///
    /// `Persistence` for SQLite or migration failures.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, op: &str, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op(op)
                .with_message("connection lock poisoned")
        })?;
        f(&mut guard)
    }

    /// Capture log entries, newest first.
    ///
    /// # Errors
    ///
    /// `Persistence` on read failure.
    pub fn list_captures(
        &self,
        document_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CaptureEntry>> {
        self.with_conn("list_captures", |conn| {
            list_captures(conn, document_id, limit)
        })
    }

    /// Row counts and per-document latest versions.
    ///
    /// # Errors
    ///
    /// `Persistence` on read failure.
    pub fn stats(&self) -> Result<StoreStats> {
        self.with_conn("stats", |conn| store_stats(conn))
    }

    /// Apply the retention policy with an explicit cutoff (epoch ms).
    ///
    /// # Errors
    ///
    /// `Persistence` on failure; nothing is deleted then.
    pub fn prune_before(&self, cutoff_ms: i64) -> Result<PruneReport> {
        let start = Instant::now();
        log_op_start!("prune", cutoff_ms = cutoff_ms);
        let result = self.with_conn("prune", |conn| prune_before(conn, cutoff_ms));
        match &result {
            Ok(report) => {
                log_op_end!(
                    "prune",
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshots_deleted = report.snapshots_deleted,
                    captures_deleted = report.captures_deleted
                );
            }
            Err(e) => {
                log_op_error!(
                    "prune",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn record_inner(&self, capture: &Capture, run_id: &str) -> Result<RecordOutcome> {
        let start = Instant::now();
        log_op_start!(
            "record",
            document_id = %capture.document_id,
            request_id = %run_id
        );

        match self.with_conn("record", |conn| record_capture(conn, capture, run_id)) {
            Ok(outcome) => {
                log_op_end!(
                    "record",
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %outcome.snapshot.snapshot_id,
                    is_new = outcome.is_new
                );
                Ok(outcome)
            }
            Err(e) => {
                log_op_error!(
                    "record",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn record(&self, capture: &Capture) -> Result<RecordOutcome> {
        self.record_inner(capture, RequestId::new().as_str())
    }

    fn record_for_run(&self, capture: &Capture, request_id: &RequestId) -> Result<RecordOutcome> {
        self.record_inner(capture, request_id.as_str())
    }

    fn latest(&self, document_id: &str) -> Result<Option<Snapshot>> {
        self.with_conn("latest", |conn| match latest_snapshot_id(conn, document_id)? {
            Some(id) => load_snapshot(conn, &id),
            None => Ok(None),
        })
    }

    fn previous_distinct(&self, document_id: &str) -> Result<Option<Snapshot>> {
        self.with_conn("previous_distinct", |conn| {
            let Some(latest) = latest_snapshot_id(conn, document_id)? else {
                return Ok(None);
            };
            match previous_distinct_snapshot_id(conn, document_id, &latest)? {
                Some(id) => load_snapshot(conn, &id),
                None => Ok(None),
            }
        })
    }

    fn comparison_pair(&self, document_id: &str) -> Result<ComparisonPair> {
        self.with_conn("comparison_pair", |conn| {
            let tx = conn.transaction().map_err(from_rusqlite)?;
            let pair = match latest_snapshot_id(&tx, document_id)? {
                None => ComparisonPair::NoHistory,
                Some(latest_id) => {
                    let previous_id = previous_distinct_snapshot_id(&tx, document_id, &latest_id)?;
                    let latest = require(load_snapshot(&tx, &latest_id)?, &latest_id)?;
                    match previous_id {
                        None => ComparisonPair::SingleVersion(latest),
                        Some(previous_id) => ComparisonPair::Ready {
                            previous: require(load_snapshot(&tx, &previous_id)?, &previous_id)?,
                            latest,
                        },
                    }
                }
            };
            tx.commit().map_err(from_rusqlite)?;
            Ok(pair)
        })
    }

    fn history(&self, document_id: &str) -> Result<Vec<SnapshotSummary>> {
        self.with_conn("history", |conn| {
            let latest = latest_snapshot_id(conn, document_id)?;
            list_snapshot_rows(conn, document_id)?
                .into_iter()
                .map(|row| {
                    let is_latest = latest.as_deref() == Some(row.snapshot_id.as_str());
                    into_snapshot(row, is_latest).map(|s| s.summary())
                })
                .collect()
        })
    }

    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        self.with_conn("get", |conn| load_snapshot(conn, snapshot_id))
    }
}

/// A snapshot referenced by the capture log must exist (foreign key).
fn require(snapshot: Option<Snapshot>, snapshot_id: &str) -> Result<Snapshot> {
    snapshot.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op("comparison_pair")
            .with_entity_id(snapshot_id)
            .with_message("capture log references a missing snapshot")
    })
}
