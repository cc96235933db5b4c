//! Snapshot records and the capture input that produces them.

use crate::errors::RegwatchError;
use crate::model::section_map::SectionMap;
use serde::{Deserialize, Serialize};

/// One capture attempt as supplied by a document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    /// Logical document the capture belongs to (e.g. "far")
    pub document_id: String,
    /// Source-assigned version identifier, not necessarily unique
    pub version_label: String,
    /// Source-supplied effective date; advisory only
    pub effective_date: String,
    pub sections: SectionMap,
}

impl Capture {
    pub fn new(
        document_id: impl Into<String>,
        version_label: impl Into<String>,
        effective_date: impl Into<String>,
        sections: SectionMap,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            version_label: version_label.into(),
            effective_date: effective_date.into(),
            sections,
        }
    }

    /// Boundary validation run by every store before touching history.
    ///
    /// # Errors
    ///
    /// `EmptyDocumentId` for a blank document id.
    pub fn validate(&self) -> Result<(), RegwatchError> {
        if self.document_id.trim().is_empty() {
            return Err(RegwatchError::EmptyDocumentId);
        }
        Ok(())
    }
}

/// A captured, fingerprinted document version.
///
/// Immutable once stored; `is_latest` is derived from the capture log when
/// the snapshot is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub document_id: String,
    pub version_label: String,
    pub effective_date: String,
    pub sections: SectionMap,
    /// SHA-256 hex over the canonical section map
    pub content_fingerprint: String,
    /// RFC3339 timestamp of the first capture of this content
    pub captured_at: String,
    pub is_latest: bool,
}

impl Snapshot {
    pub fn version_ref(&self) -> VersionRef {
        VersionRef {
            snapshot_id: self.snapshot_id.clone(),
            version_label: self.version_label.clone(),
            fingerprint: self.content_fingerprint.clone(),
        }
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            snapshot_id: self.snapshot_id.clone(),
            version_label: self.version_label.clone(),
            effective_date: self.effective_date.clone(),
            content_fingerprint: self.content_fingerprint.clone(),
            section_count: self.sections.len(),
            captured_at: self.captured_at.clone(),
            is_latest: self.is_latest,
        }
    }
}

/// Identity of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRef {
    pub snapshot_id: String,
    pub version_label: String,
    pub fingerprint: String,
}

/// History listing entry (sections omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub snapshot_id: String,
    pub version_label: String,
    pub effective_date: String,
    pub content_fingerprint: String,
    pub section_count: usize,
    pub captured_at: String,
    pub is_latest: bool,
}

/// Result of `SnapshotStore::record`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// The stored snapshot, flagged latest
    pub snapshot: Snapshot,
    /// False when the fingerprint already existed and history did not grow
    pub is_new: bool,
}
