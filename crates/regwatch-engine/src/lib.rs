//! Regwatch Engine - orchestration layer
//!
//! Coordinates a `SnapshotStore`, the diff engine and the report builder
//! into the capture and compare commands, and provides the enrichment
//! boundary (timeouts, external command) and the document source loader.

pub mod commands;
pub mod enrichment;
pub mod source;
