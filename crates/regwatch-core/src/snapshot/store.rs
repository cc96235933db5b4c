//! The snapshot store contract.

use crate::errors::Result;
use crate::model::{Capture, RecordOutcome, Snapshot, SnapshotSummary};
use regwatch_core_types::RequestId;

/// What a document's history currently allows comparing.
///
/// Absence is not an error: callers distinguish "nothing captured yet" and
/// "only one distinct version" from a failed comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonPair {
    /// No capture has happened for the document
    NoHistory,
    /// Exactly one distinct version exists
    SingleVersion(Snapshot),
    /// The latest snapshot and the most recent one with a different
    /// fingerprint, read in one consistent view of history
    Ready { previous: Snapshot, latest: Snapshot },
}

/// Ordered, deduplicated snapshot history, one history per document id.
///
/// Implementations must make `record` a single atomic unit: a concurrent
/// reader never sees a partially appended snapshot or two latest snapshots,
/// and a failed `record` leaves history untouched.
pub trait SnapshotStore: Send + Sync {
    /// Record a capture.
    ///
    /// When a snapshot with the same fingerprint exists for the document it
    /// becomes latest again and is returned with `is_new = false`;
    /// otherwise a new snapshot is appended.
    ///
    /// # Errors
    ///
    /// Validation errors for malformed captures (no mutation), storage
    /// errors from the backend.
    fn record(&self, capture: &Capture) -> Result<RecordOutcome>;

    /// Record a capture on behalf of an identified run.
    ///
    /// Stores that keep a capture log attach `request_id` to the log entry;
    /// the default ignores it.
    ///
    /// # Errors
    ///
    /// As [`SnapshotStore::record`].
    fn record_for_run(&self, capture: &Capture, request_id: &RequestId) -> Result<RecordOutcome> {
        let _ = request_id;
        self.record(capture)
    }

    /// The most recently captured distinct snapshot.
    ///
    /// # Errors
    ///
    /// Storage errors only; an empty history is `Ok(None)`.
    fn latest(&self, document_id: &str) -> Result<Option<Snapshot>>;

    /// The most recent snapshot whose fingerprint differs from `latest`.
    ///
    /// # Errors
    ///
    /// Storage errors only; fewer than two distinct versions is `Ok(None)`.
    fn previous_distinct(&self, document_id: &str) -> Result<Option<Snapshot>>;

    /// Latest and previous-distinct read together.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    fn comparison_pair(&self, document_id: &str) -> Result<ComparisonPair>;

    /// All snapshots of a document in first-capture order.
    ///
    /// # Errors
    ///
    /// Storage errors only.
    fn history(&self, document_id: &str) -> Result<Vec<SnapshotSummary>>;

    /// Fetch one snapshot by id.
    ///
    /// # Errors
    ///
    /// Storage errors only; an unknown id is `Ok(None)`.
    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>>;
}
