//! Regwatch Core - snapshot history and change classification
//!
//! This crate provides the pure, synchronous kernel of regwatch:
//! - Validated section maps and snapshot records
//! - Content fingerprints and the `SnapshotStore` contract, with an
//!   in-memory implementation
//! - Ratcliff/Obershelp similarity scoring
//! - The section diff engine (added / removed / modified)
//! - The report builder with per-change enrichment fallback
//! - Error facility, logging facility and configuration
//!
//! Durable storage lives in `regwatch-store`; orchestration in
//! `regwatch-engine`.

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod report;
pub mod similarity;
pub mod snapshot;

pub use regwatch_core_types as core_types;

// Re-export commonly used types
pub use config::RegwatchConfig;
pub use diff::{diff, Change, ChangeKind, ChangeSet, DiffOptions};
pub use errors::{ExError, ExErrorKind, RegwatchError, Result};
pub use model::{Capture, RecordOutcome, SectionMap, Snapshot, SnapshotSummary, VersionRef};
pub use report::{build_report, Enricher, ReportOptions, StructuredReport};
pub use similarity::{similarity, similarity_with, Granularity};
pub use snapshot::{ComparisonPair, MemorySnapshotStore, SnapshotStore};
