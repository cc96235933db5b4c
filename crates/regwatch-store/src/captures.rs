//! Capture log listing.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::snapshot::query::ms_to_rfc3339;
use rusqlite::Connection;
use serde::Serialize;

/// One capture log entry joined with the snapshot it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureEntry {
    pub seq: i64,
    pub run_id: String,
    pub document_id: String,
    pub snapshot_id: String,
    pub version_label: String,
    /// `new` or `duplicate`
    pub status: String,
    pub captured_at: String,
}

/// Most recent capture log entries, newest first.
///
/// # Errors
///
/// - `Persistence`: SQLite read failed
pub fn list_captures(
    conn: &Connection,
    document_id: Option<&str>,
    limit: usize,
) -> Result<Vec<CaptureEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.seq, c.run_id, c.document_id, c.snapshot_id, s.version_label,
                    c.status, c.captured_at
             FROM captures c
             JOIN snapshots s ON s.snapshot_id = c.snapshot_id
             WHERE ?1 IS NULL OR c.document_id = ?1
             ORDER BY c.seq DESC
             LIMIT ?2",
        )
        .map_err(from_rusqlite)?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(rusqlite::params![document_id, limit], |row| {
            Ok(CaptureEntry {
                seq: row.get(0)?,
                run_id: row.get(1)?,
                document_id: row.get(2)?,
                snapshot_id: row.get(3)?,
                version_label: row.get(4)?,
                status: row.get(5)?,
                captured_at: ms_to_rfc3339(row.get(6)?),
            })
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}
