// Integration tests for the migration runner

use regwatch_core::ExErrorKind;
use regwatch_store::migrations::apply_migrations;
use regwatch_store::SqliteSnapshotStore;
use rusqlite::Connection;
use tempfile::TempDir;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

#[test]
fn test_migrations_create_schema() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    assert!(table_exists(&conn, "schema_version"));
    assert!(table_exists(&conn, "snapshots"));
    assert!(table_exists(&conn, "captures"));
}

#[test]
fn test_migrations_are_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 1);
}

#[test]
fn test_tampered_checksum_is_rejected_on_open() {
    // Given: a migrated database on disk
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");
    drop(SqliteSnapshotStore::open(&path).unwrap());

    // When: the recorded checksum no longer matches the embedded SQL
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'bogus' WHERE migration_id = '001_snapshot_history'",
        [],
    )
    .unwrap();
    drop(conn);

    // Then: opening the store fails instead of running on a drifted schema
    let err = match SqliteSnapshotStore::open(&path) {
        Ok(_) => panic!("expected checksum mismatch"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.entity_id(), Some("001_snapshot_history"));
}
