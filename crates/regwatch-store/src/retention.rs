//! Retention policy.
//!
//! Deletes snapshots nobody has captured since a cutoff. The latest
//! snapshot of every document is always kept, however old its captures
//! are, so `latest()` never changes as a result of pruning.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

/// Rows removed by one pruning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub snapshots_deleted: usize,
    pub captures_deleted: usize,
}

/// Delete every non-latest snapshot whose most recent capture is older than
/// `cutoff_ms` (epoch milliseconds), together with its capture log rows.
///
/// # Errors
///
/// - `Persistence`: SQLite failure; nothing is deleted
pub fn prune_before(conn: &mut Connection, cutoff_ms: i64) -> Result<PruneReport> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;

    tx.execute_batch(
        "CREATE TEMP TABLE IF NOT EXISTS prune_targets (snapshot_id TEXT PRIMARY KEY);
         DELETE FROM prune_targets;",
    )
    .map_err(from_rusqlite)?;

    tx.execute(
        "INSERT INTO prune_targets (snapshot_id)
         SELECT s.snapshot_id
         FROM snapshots s
         WHERE (SELECT MAX(c.captured_at) FROM captures c WHERE c.snapshot_id = s.snapshot_id)
               < ?1
           AND s.snapshot_id NOT IN (
               SELECT c.snapshot_id FROM captures c
               WHERE c.seq = (SELECT MAX(c2.seq) FROM captures c2
                              WHERE c2.document_id = c.document_id)
           )",
        [cutoff_ms],
    )
    .map_err(from_rusqlite)?;

    let captures_deleted = tx
        .execute(
            "DELETE FROM captures WHERE snapshot_id IN (SELECT snapshot_id FROM prune_targets)",
            [],
        )
        .map_err(from_rusqlite)?;
    let snapshots_deleted = tx
        .execute(
            "DELETE FROM snapshots WHERE snapshot_id IN (SELECT snapshot_id FROM prune_targets)",
            [],
        )
        .map_err(from_rusqlite)?;

    tx.execute("DELETE FROM prune_targets", [])
        .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        component = module_path!(),
        snapshots_deleted = snapshots_deleted,
        captures_deleted = captures_deleted,
        "Pruned snapshot history"
    );

    Ok(PruneReport {
        snapshots_deleted,
        captures_deleted,
    })
}

/// Cutoff for keeping `days_to_keep` days of history relative to `now_ms`
pub fn cutoff_for_days(now_ms: i64, days_to_keep: u32) -> i64 {
    now_ms - i64::from(days_to_keep) * 24 * 60 * 60 * 1000
}
