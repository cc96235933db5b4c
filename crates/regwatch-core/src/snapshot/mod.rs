//! Snapshot history: fingerprinting and the store abstraction.
//!
//! ## Responsibilities
//!
//! - Compute deterministic content fingerprints over section maps
//! - Define the `SnapshotStore` contract (record / latest / previous distinct)
//! - Provide an in-memory store used by tests and embedders
//!
//! ## Non-Responsibilities
//!
//! - Durable persistence (handled by `regwatch-store`)
//! - Orchestration of capture + compare (handled by `regwatch-engine`)

pub mod digest;
pub mod memory;
pub mod store;

pub use digest::{compute_fingerprint, hash_canonical};
pub use memory::MemorySnapshotStore;
pub use store::{ComparisonPair, SnapshotStore};
