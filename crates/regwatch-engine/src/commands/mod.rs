//! Command orchestration layer.
//!
//! Each command works against any `SnapshotStore`, so the same code runs on
//! the SQLite store and the in-memory store used in tests.

pub mod capture;
pub mod compare;
