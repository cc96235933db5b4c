//! Store statistics.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::snapshot::query::{latest_snapshot_id, ms_to_rfc3339};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

/// Latest version of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLatest {
    pub document_id: String,
    pub snapshot_id: String,
    pub version_label: String,
    pub effective_date: String,
    pub captured_at: String,
}

/// Row counts and per-document latest versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub snapshot_count: u64,
    pub capture_count: u64,
    /// Captures that re-recorded already known content
    pub duplicate_capture_count: u64,
    pub documents: Vec<DocumentLatest>,
}

fn count(conn: &Connection, sql: &str) -> Result<u64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0)).map_err(from_rusqlite)?;
    Ok(n.max(0) as u64)
}

fn captured_documents(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT document_id FROM captures ORDER BY document_id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

/// Gather statistics over the whole store.
///
/// # Errors
///
/// - `Persistence`: SQLite read failed
pub fn store_stats(conn: &Connection) -> Result<StoreStats> {
    let snapshot_count = count(conn, "SELECT COUNT(*) FROM snapshots")?;
    let capture_count = count(conn, "SELECT COUNT(*) FROM captures")?;
    let duplicate_capture_count =
        count(conn, "SELECT COUNT(*) FROM captures WHERE status = 'duplicate'")?;

    let document_ids = captured_documents(conn)?;

    let mut documents = Vec::with_capacity(document_ids.len());
    for document_id in document_ids {
        let Some(snapshot_id) = latest_snapshot_id(conn, &document_id)? else {
            continue;
        };
        let latest = conn
            .query_row(
                "SELECT version_label, effective_date, captured_at
                 FROM snapshots WHERE snapshot_id = ?1",
                [&snapshot_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;
        if let Some((version_label, effective_date, captured_at)) = latest {
            documents.push(DocumentLatest {
                document_id,
                snapshot_id,
                version_label,
                effective_date,
                captured_at: ms_to_rfc3339(captured_at),
            });
        }
    }

    Ok(StoreStats {
        snapshot_count,
        capture_count,
        duplicate_capture_count,
        documents,
    })
}
