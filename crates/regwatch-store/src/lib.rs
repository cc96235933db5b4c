//! Regwatch Store - durable snapshot history on SQLite
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - `SqliteSnapshotStore`, the persistent `SnapshotStore`
//! - Capture log listing, store statistics and retention pruning

pub mod captures;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod retention;
pub mod snapshot;
pub mod sqlite_store;
pub mod stats;

// Re-export key types
pub use errors::Result;
pub use sqlite_store::SqliteSnapshotStore;
