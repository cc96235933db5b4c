//! Change set output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use crate::model::VersionRef;
use serde::{Deserialize, Serialize};

/// Classification of one section difference.
///
/// Variant order is the order changes appear in a `ChangeSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }

    /// Capitalized label for rendered reports
    pub fn title(&self) -> &'static str {
        match self {
            ChangeKind::Added => "Added",
            ChangeKind::Removed => "Removed",
            ChangeKind::Modified => "Modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified section difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub section_id: String,
    /// Empty for `added`
    pub old_content: String,
    /// Empty for `removed`
    pub new_content: String,
    /// Present only for `modified`; below the threshold that produced it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub similarity: Option<f64>,
    /// Deterministic mechanical description, used when no enrichment exists
    pub summary: String,
}

impl Change {
    pub fn added(section_id: impl Into<String>, new_content: impl Into<String>) -> Self {
        let section_id = section_id.into();
        Self {
            kind: ChangeKind::Added,
            summary: format!("New section added: {section_id}"),
            section_id,
            old_content: String::new(),
            new_content: new_content.into(),
            similarity: None,
        }
    }

    pub fn removed(section_id: impl Into<String>, old_content: impl Into<String>) -> Self {
        let section_id = section_id.into();
        Self {
            kind: ChangeKind::Removed,
            summary: format!("Section removed: {section_id}"),
            section_id,
            old_content: old_content.into(),
            new_content: String::new(),
            similarity: None,
        }
    }

    pub fn modified(
        section_id: impl Into<String>,
        old_content: impl Into<String>,
        new_content: impl Into<String>,
        similarity: f64,
    ) -> Self {
        let section_id = section_id.into();
        Self {
            kind: ChangeKind::Modified,
            summary: format!("Section modified: {section_id} (similarity: {similarity:.2})"),
            section_id,
            old_content: old_content.into(),
            new_content: new_content.into(),
            similarity: Some(similarity),
        }
    }
}

/// The complete, ordered set of differences between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub source_version: VersionRef,
    pub target_version: VersionRef,
    /// Threshold the modified set was computed with
    pub threshold: f64,
    /// Added, then removed, then modified; each group sorted by section id
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Number of changes of one kind
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// Section ids of one kind, in change-set order
    pub fn ids(&self, kind: ChangeKind) -> Vec<String> {
        self.changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.section_id.clone())
            .collect()
    }
}
