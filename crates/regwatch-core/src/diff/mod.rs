//! Section diff engine.
//!
//! Compares the section maps of two snapshots of the same document and
//! classifies every differing section as added, removed or modified.
//!
//! ## Entry point
//!
//! ```ignore
//! use regwatch_core::diff::{diff, DiffOptions};
//!
//! let change_set = diff(&previous, &latest, &DiffOptions::default())?;
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical change sets, in the
//!   same order with the same similarity values.
//! - **Fingerprint short-circuit**: snapshots with equal fingerprints yield
//!   an empty change set without inspecting sections.
//! - **Partition**: every section id in either snapshot is added, removed,
//!   modified or unchanged, never more than one of these.
//! - **Noise suppression**: edits scoring at or above the threshold are not
//!   reported.

pub mod engine;
pub mod model;

pub use engine::{diff, diff_sections, DiffOptions, DEFAULT_THRESHOLD};
pub use model::{Change, ChangeKind, ChangeSet};
