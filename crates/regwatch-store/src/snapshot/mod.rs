//! Snapshot persistence layer.
//!
//! ## Responsibilities
//!
//! - Insert immutable snapshot rows, deduplicated by fingerprint
//! - Append the capture log that defines which snapshot is latest
//! - Atomic record (`IMMEDIATE` transaction)
//! - Re-verify stored content against its fingerprint on load
//!
//! ## Non-Responsibilities
//!
//! - Fingerprinting and diffing (handled by `regwatch-core`)
//! - Orchestration (handled by `regwatch-engine`)

pub mod persist;
pub mod query;

// Re-export primary types
pub use persist::{record_capture, CaptureStatus};
pub use query::{load_snapshot, SnapshotRow};
