//! Read-only snapshot queries.
//!
//! Every function takes a `&Connection`, so callers can run several of them
//! inside one transaction for a consistent view.

#![allow(clippy::result_large_err)]

use crate::errors::{corrupt_snapshot, from_rusqlite, Result};
use chrono::{SecondsFormat, TimeZone, Utc};
use regwatch_core::snapshot::compute_fingerprint;
use regwatch_core::{SectionMap, Snapshot};
use rusqlite::{Connection, OptionalExtension, Row};

/// A raw row from the `snapshots` table.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    /// Unique snapshot identifier (UUIDv7)
    pub snapshot_id: String,
    pub document_id: String,
    pub version_label: String,
    pub effective_date: String,
    pub content_fingerprint: String,
    /// Canonical section map JSON, the fingerprint input
    pub sections_json: String,
    pub section_count: i64,
    /// First capture, milliseconds since epoch
    pub captured_at: i64,
}

const SNAPSHOT_COLUMNS: &str = "snapshot_id, document_id, version_label, effective_date,
     content_fingerprint, sections_json, section_count, captured_at";

fn row_to_snapshot_row(row: &Row<'_>) -> rusqlite::Result<SnapshotRow> {
    Ok(SnapshotRow {
        snapshot_id: row.get(0)?,
        document_id: row.get(1)?,
        version_label: row.get(2)?,
        effective_date: row.get(3)?,
        content_fingerprint: row.get(4)?,
        sections_json: row.get(5)?,
        section_count: row.get(6)?,
        captured_at: row.get(7)?,
    })
}

/// Fetch one snapshot row by id.
///
/// # Errors
///
/// - `Persistence`: SQLite read failed
pub fn fetch_snapshot_row(conn: &Connection, snapshot_id: &str) -> Result<Option<SnapshotRow>> {
    conn.query_row(
        &format!("SELECT {SNAPSHOT_COLUMNS} FROM snapshots WHERE snapshot_id = ?1"),
        [snapshot_id],
        row_to_snapshot_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Snapshot id with the given fingerprint in a document's history
pub fn find_by_fingerprint(
    conn: &Connection,
    document_id: &str,
    fingerprint: &str,
) -> Result<Option<String>> {
    conn.query_row(
        "SELECT snapshot_id FROM snapshots
         WHERE document_id = ?1 AND content_fingerprint = ?2",
        [document_id, fingerprint],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Snapshot referenced by the document's most recent capture
pub fn latest_snapshot_id(conn: &Connection, document_id: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT snapshot_id FROM captures
         WHERE document_id = ?1
         ORDER BY seq DESC
         LIMIT 1",
        [document_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Most recently captured snapshot other than `latest_id`.
///
/// Fingerprints are unique per document, so a different snapshot id means
/// different content.
pub fn previous_distinct_snapshot_id(
    conn: &Connection,
    document_id: &str,
    latest_id: &str,
) -> Result<Option<String>> {
    conn.query_row(
        "SELECT snapshot_id FROM captures
         WHERE document_id = ?1 AND snapshot_id != ?2
         ORDER BY seq DESC
         LIMIT 1",
        [document_id, latest_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// All snapshot rows of a document in first-capture order.
pub fn list_snapshot_rows(conn: &Connection, document_id: &str) -> Result<Vec<SnapshotRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM snapshots WHERE document_id = ?1 ORDER BY rowid"
        ))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([document_id], row_to_snapshot_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// Load a full snapshot by id, with `is_latest` derived from the capture
/// log.
///
/// # Errors
///
/// - `Persistence`: SQLite read failed, or the stored content no longer
///   matches its fingerprint
pub fn load_snapshot(conn: &Connection, snapshot_id: &str) -> Result<Option<Snapshot>> {
    let Some(row) = fetch_snapshot_row(conn, snapshot_id)? else {
        return Ok(None);
    };
    let latest = latest_snapshot_id(conn, &row.document_id)?;
    let is_latest = latest.as_deref() == Some(row.snapshot_id.as_str());
    into_snapshot(row, is_latest).map(Some)
}

/// Decode a row, re-verifying its content against the stored fingerprint.
pub fn into_snapshot(row: SnapshotRow, is_latest: bool) -> Result<Snapshot> {
    let sections: SectionMap = serde_json::from_str(&row.sections_json)
        .map_err(|e| corrupt_snapshot(&row.snapshot_id, &e.to_string()))?;
    let fingerprint = compute_fingerprint(&sections)
        .map_err(|e| corrupt_snapshot(&row.snapshot_id, &e.to_string()))?;
    if fingerprint != row.content_fingerprint {
        return Err(corrupt_snapshot(
            &row.snapshot_id,
            "content does not match fingerprint",
        ));
    }

    Ok(Snapshot {
        snapshot_id: row.snapshot_id,
        document_id: row.document_id,
        version_label: row.version_label,
        effective_date: row.effective_date,
        sections,
        content_fingerprint: row.content_fingerprint,
        captured_at: ms_to_rfc3339(row.captured_at),
        is_latest,
    })
}

/// Render epoch milliseconds as RFC3339 (UTC, millisecond precision)
pub fn ms_to_rfc3339(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}
