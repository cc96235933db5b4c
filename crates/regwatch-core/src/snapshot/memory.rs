//! In-memory snapshot store.
//!
//! History is an append-only list of snapshots plus an append-only capture
//! log. "Latest" is the snapshot referenced by the newest capture entry, so
//! there is no flag to keep consistent. Both lists live behind one `RwLock`;
//! `record` holds the write guard for the whole check-then-append.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{Capture, RecordOutcome, Snapshot, SnapshotSummary};
use crate::snapshot::digest::compute_fingerprint;
use crate::snapshot::store::{ComparisonPair, SnapshotStore};
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Default)]
struct History {
    /// Stored with `is_latest = false`; the flag is derived on read
    snapshots: Vec<Snapshot>,
    /// (document_id, index into `snapshots`) in capture order
    captures: Vec<(String, usize)>,
}

impl History {
    fn latest_index(&self, document_id: &str) -> Option<usize> {
        self.captures
            .iter()
            .rev()
            .find(|(doc, _)| doc == document_id)
            .map(|(_, idx)| *idx)
    }

    fn previous_distinct_index(&self, document_id: &str) -> Option<usize> {
        let latest = self.latest_index(document_id)?;
        let latest_fp = &self.snapshots[latest].content_fingerprint;
        self.captures
            .iter()
            .rev()
            .filter(|(doc, _)| doc == document_id)
            .map(|(_, idx)| *idx)
            .find(|idx| &self.snapshots[*idx].content_fingerprint != latest_fp)
    }

    fn materialize(&self, idx: usize) -> Snapshot {
        let mut snapshot = self.snapshots[idx].clone();
        snapshot.is_latest = self.latest_index(&snapshot.document_id) == Some(idx);
        snapshot
    }
}

/// Thread-safe in-memory `SnapshotStore`.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    inner: RwLock<History>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of capture calls recorded for a document (new or duplicate)
    ///
    /// # Errors
    ///
    /// `Concurrency` if the lock was poisoned.
    pub fn capture_count(&self, document_id: &str) -> Result<usize> {
        let history = self.read("capture_count")?;
        Ok(history
            .captures
            .iter()
            .filter(|(doc, _)| doc == document_id)
            .count())
    }

    fn read(&self, op: &str) -> Result<RwLockReadGuard<'_, History>> {
        self.inner.read().map_err(|_| poisoned(op))
    }

    fn write(&self, op: &str) -> Result<RwLockWriteGuard<'_, History>> {
        self.inner.write().map_err(|_| poisoned(op))
    }

    fn record_inner(&self, capture: &Capture) -> Result<RecordOutcome> {
        capture.validate()?;
        let fingerprint = compute_fingerprint(&capture.sections)?;

        let mut history = self.write("record")?;

        let existing = history.snapshots.iter().position(|s| {
            s.document_id == capture.document_id && s.content_fingerprint == fingerprint
        });

        let (idx, is_new) = match existing {
            Some(idx) => (idx, false),
            None => {
                history.snapshots.push(Snapshot {
                    snapshot_id: uuid::Uuid::now_v7().to_string(),
                    document_id: capture.document_id.clone(),
                    version_label: capture.version_label.clone(),
                    effective_date: capture.effective_date.clone(),
                    sections: capture.sections.clone(),
                    content_fingerprint: fingerprint,
                    captured_at: chrono::Utc::now()
                        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                    is_latest: false,
                });
                (history.snapshots.len() - 1, true)
            }
        };
        history.captures.push((capture.document_id.clone(), idx));

        Ok(RecordOutcome {
            snapshot: history.materialize(idx),
            is_new,
        })
    }
}

fn poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(op)
        .with_message("snapshot history lock poisoned")
}

impl SnapshotStore for MemorySnapshotStore {
    fn record(&self, capture: &Capture) -> Result<RecordOutcome> {
        let start = Instant::now();
        log_op_start!("record", document_id = %capture.document_id);

        match self.record_inner(capture) {
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
                Err(e.with_op("record"))
            }
        }
    }

    fn latest(&self, document_id: &str) -> Result<Option<Snapshot>> {
        let history = self.read("latest")?;
        Ok(history
            .latest_index(document_id)
            .map(|idx| history.materialize(idx)))
    }

    fn previous_distinct(&self, document_id: &str) -> Result<Option<Snapshot>> {
        let history = self.read("previous_distinct")?;
        Ok(history
            .previous_distinct_index(document_id)
            .map(|idx| history.materialize(idx)))
    }

    fn comparison_pair(&self, document_id: &str) -> Result<ComparisonPair> {
        let history = self.read("comparison_pair")?;
        let Some(latest) = history.latest_index(document_id) else {
            return Ok(ComparisonPair::NoHistory);
        };
        Ok(match history.previous_distinct_index(document_id) {
            None => ComparisonPair::SingleVersion(history.materialize(latest)),
            Some(previous) => ComparisonPair::Ready {
                previous: history.materialize(previous),
                latest: history.materialize(latest),
            },
        })
    }

    fn history(&self, document_id: &str) -> Result<Vec<SnapshotSummary>> {
        let history = self.read("history")?;
        Ok(history
            .snapshots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.document_id == document_id)
            .map(|(idx, _)| history.materialize(idx).summary())
            .collect())
    }

    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        let history = self.read("get")?;
        Ok(history
            .snapshots
            .iter()
            .position(|s| s.snapshot_id == snapshot_id)
            .map(|idx| history.materialize(idx)))
    }
}
