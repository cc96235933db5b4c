//! Snapshot persistence operations.
//!
//! `record_capture` is the only writer of snapshot history. It runs as one
//! `IMMEDIATE` transaction: the write lock is taken before the fingerprint
//! lookup, so two processes recording the same content cannot both append.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::snapshot::query::{find_by_fingerprint, fetch_snapshot_row, into_snapshot};
use regwatch_core::errors::{ExError, ExErrorKind};
use regwatch_core::snapshot::compute_fingerprint;
use regwatch_core::{Capture, RecordOutcome};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Capture log status of a record call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus {
    New,
    Duplicate,
}

impl CaptureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStatus::New => "new",
            CaptureStatus::Duplicate => "duplicate",
        }
    }
}

fn persistence(op: &str, context: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op)
        .with_message(format!("{}: {}", context, err))
}

/// Insert an immutable snapshot row.
fn insert_snapshot_row(
    tx: &Transaction,
    snapshot_id: &str,
    capture: &Capture,
    fingerprint: &str,
    sections_json: &str,
    captured_at_ms: i64,
) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO snapshots (
            snapshot_id,
            document_id,
            version_label,
            effective_date,
            content_fingerprint,
            sections_json,
            section_count,
            captured_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        rusqlite::params![
            snapshot_id,
            capture.document_id,
            capture.version_label,
            capture.effective_date,
            fingerprint,
            sections_json,
            capture.sections.len() as i64,
            captured_at_ms,
        ],
    )
    .map_err(|e| persistence("insert_snapshot_row", "Failed to insert snapshot", e))?;

    tracing::debug!(
        snapshot_id = %snapshot_id,
        document_id = %capture.document_id,
        section_count = capture.sections.len(),
        "Inserted snapshot row"
    );
    Ok(())
}

/// Append one entry to the capture log.
fn append_capture(
    tx: &Transaction,
    run_id: &str,
    document_id: &str,
    snapshot_id: &str,
    status: CaptureStatus,
    captured_at_ms: i64,
) -> Result<i64> {
    tx.execute(
        "INSERT INTO captures (run_id, document_id, snapshot_id, status, captured_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![run_id, document_id, snapshot_id, status.as_str(), captured_at_ms],
    )
    .map_err(|e| persistence("append_capture", "Failed to append capture", e))?;
    Ok(tx.last_insert_rowid())
}

/// Record a capture atomically.
///
/// 1. Validate and fingerprint (no database access)
/// 2. Begin an `IMMEDIATE` transaction
/// 3. Reuse the snapshot with the same fingerprint, or insert a new row
/// 4. Append a capture log entry, making that snapshot latest
/// 5. Commit
///
/// ## Errors
///
/// - Validation errors from the capture (nothing written)
/// - `ExErrorKind::Persistence`: any database failure; the transaction is
///   rolled back and history is unchanged
pub fn record_capture(
    conn: &mut Connection,
    capture: &Capture,
    run_id: &str,
) -> Result<RecordOutcome> {
    capture.validate()?;
    let fingerprint = compute_fingerprint(&capture.sections)?;
    let sections_json = capture.sections.canonical_json()?;
    let now_ms = chrono::Utc::now().timestamp_millis();

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| persistence("record_capture", "Failed to start transaction", e))?;

    let (snapshot_id, status) =
        match find_by_fingerprint(&tx, &capture.document_id, &fingerprint)? {
            Some(existing) => (existing, CaptureStatus::Duplicate),
            None => {
                let snapshot_id = uuid::Uuid::now_v7().to_string();
                insert_snapshot_row(
                    &tx,
                    &snapshot_id,
                    capture,
                    &fingerprint,
                    &sections_json,
                    now_ms,
                )?;
                (snapshot_id, CaptureStatus::New)
            }
        };

    let seq = append_capture(
        &tx,
        run_id,
        &capture.document_id,
        &snapshot_id,
        status,
        now_ms,
    )?;

    let row = fetch_snapshot_row(&tx, &snapshot_id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op("record_capture")
            .with_entity_id(snapshot_id.clone())
            .with_message("snapshot row vanished inside its own transaction")
    })?;
    let snapshot = into_snapshot(row, true)?;

    tx.commit()
        .map_err(|e| persistence("record_capture", "Failed to commit transaction", e))?;

    tracing::debug!(
        snapshot_id = %snapshot.snapshot_id,
        seq = seq,
        status = status.as_str(),
        "Recorded capture"
    );

    Ok(RecordOutcome {
        snapshot,
        is_new: status == CaptureStatus::New,
    })
}
