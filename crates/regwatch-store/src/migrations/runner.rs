//! Schema migration runner.
//!
//! `schema_version` records each applied migration with the SHA-256 of its
//! SQL. Before anything new is applied, every recorded row must name an
//! embedded migration with an unchanged checksum; a database written by a
//! newer build or an edited migration refuses to open. Pending migrations
//! then run one transaction each.

#![allow(clippy::result_large_err)]

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{Migration, MIGRATIONS};
use regwatch_core::errors::{ExError, ExErrorKind};
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Bring the schema up to date.
///
/// # Errors
///
/// `Persistence` for an unknown or altered applied migration, or when a
/// pending migration's SQL fails.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    apply_from(conn, MIGRATIONS)
}

fn apply_from(conn: &mut Connection, migrations: &[Migration]) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL,
            checksum TEXT NOT NULL
        )",
    )
    .map_err(from_rusqlite)?;

    let applied = applied_checksums(conn)?;
    verify_applied(&applied, migrations)?;

    let mut count = 0;
    for migration in migrations
        .iter()
        .filter(|m| !applied.contains_key(m.id))
    {
        apply_one(conn, migration)?;
        count += 1;
    }
    if count > 0 {
        tracing::info!(applied = count, "Schema migrated");
    }
    Ok(())
}

/// migration_id -> recorded checksum
fn applied_checksums(conn: &Connection) -> Result<BTreeMap<String, String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, checksum FROM schema_version")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<BTreeMap<String, String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

fn verify_applied(applied: &BTreeMap<String, String>, migrations: &[Migration]) -> Result<()> {
    for (id, recorded) in applied {
        let Some(migration) = migrations.iter().find(|m| m.id == id) else {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("migration")
                .with_entity_id(id.as_str())
                .with_message(format!(
                    "Database has migration {id} which this build does not know; \
                     it was written by a newer version"
                )));
        };
        let expected = compute_checksum(migration.sql);
        if *recorded != expected {
            return Err(checksum_mismatch(id, recorded, &expected));
        }
    }
    Ok(())
}

fn apply_one(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.id,
            chrono::Utc::now().to_rfc3339(),
            compute_checksum(migration.sql)
        ],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id = migration.id, "Applied migration");
    Ok(())
}
