//! Domain model: section maps, captures and snapshots.

pub mod section_map;
pub mod snapshot;

pub use section_map::SectionMap;
pub use snapshot::{Capture, RecordOutcome, Snapshot, SnapshotSummary, VersionRef};
