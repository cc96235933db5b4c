//! Section diff computation.
//!
//! The entry point is [`diff`], which takes two snapshots of one document
//! and produces a [`ChangeSet`].

use crate::diff::model::{Change, ChangeSet};
use crate::errors::{ExError, RegwatchError, Result};
use crate::model::{SectionMap, Snapshot};
use crate::similarity::{similarity_with, Granularity};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Similarity at or above which an edit is treated as formatting noise
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Tuning for one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Edits scoring strictly below this are reported as modified
    pub threshold: f64,
    pub granularity: Granularity,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            granularity: Granularity::default(),
        }
    }
}

impl DiffOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// `InvalidThreshold` unless `0 < threshold <= 1`.
    pub fn validate(&self) -> std::result::Result<(), RegwatchError> {
        if self.threshold.is_nan() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(RegwatchError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// Compare two snapshots of the same document.
///
/// Equal fingerprints short-circuit to an empty change set. Comparing a
/// snapshot with itself is valid.
///
/// # Errors
///
/// - `DocumentMismatch` when the snapshots belong to different documents
/// - `InvalidThreshold` when the threshold is outside (0, 1]
///
/// Neither error has side effects.
pub fn diff(old: &Snapshot, new: &Snapshot, options: &DiffOptions) -> Result<ChangeSet> {
    let start = Instant::now();
    log_op_start!(
        "diff",
        document_id = %new.document_id,
        from = %old.snapshot_id,
        to = %new.snapshot_id
    );

    match diff_checked(old, new, options) {
        Ok(change_set) => {
            log_op_end!(
                "diff",
                duration_ms = start.elapsed().as_millis() as u64,
                change_count = change_set.len()
            );
            Ok(change_set)
        }
        Err(e) => {
            log_op_error!(
                "diff",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e.with_op("diff"))
        }
    }
}

fn diff_checked(old: &Snapshot, new: &Snapshot, options: &DiffOptions) -> Result<ChangeSet> {
    if old.document_id != new.document_id {
        return Err(RegwatchError::DocumentMismatch {
            left: old.document_id.clone(),
            right: new.document_id.clone(),
        }
        .into());
    }
    options.validate().map_err(ExError::from)?;

    let changes = if old.content_fingerprint == new.content_fingerprint {
        Vec::new()
    } else {
        diff_sections(&old.sections, &new.sections, options)
    };

    Ok(ChangeSet {
        source_version: old.version_ref(),
        target_version: new.version_ref(),
        threshold: options.threshold,
        changes,
    })
}

/// Classify the differences between two section maps.
///
/// Assumes `options` was validated. Output order: added, removed,
/// modified, each sorted by section id (inherited from `SectionMap`'s key
/// order).
pub fn diff_sections(old: &SectionMap, new: &SectionMap, options: &DiffOptions) -> Vec<Change> {
    let added = new
        .iter()
        .filter(|(id, _)| !old.contains(id))
        .map(|(id, content)| Change::added(id, content));

    let removed = old
        .iter()
        .filter(|(id, _)| !new.contains(id))
        .map(|(id, content)| Change::removed(id, content));

    let modified = old.iter().filter_map(|(id, old_content)| {
        let new_content = new.get(id)?;
        if old_content == new_content {
            return None;
        }
        let score = similarity_with(old_content, new_content, options.granularity);
        (score < options.threshold).then(|| Change::modified(id, old_content, new_content, score))
    });

    added.chain(removed).chain(modified).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::ChangeKind;
    use crate::errors::ExErrorKind;
    use crate::snapshot::compute_fingerprint;

    fn snapshot(document_id: &str, id: &str, pairs: &[(&str, &str)]) -> Snapshot {
        let sections = SectionMap::from_pairs(pairs.iter().copied()).unwrap();
        Snapshot {
            snapshot_id: id.to_string(),
            document_id: document_id.to_string(),
            version_label: id.to_string(),
            effective_date: String::new(),
            content_fingerprint: compute_fingerprint(&sections).unwrap(),
            sections,
            captured_at: "2025-01-01T00:00:00Z".to_string(),
            is_latest: false,
        }
    }

    #[test]
    fn test_added_and_removed_with_exact_match_unchanged() {
        let old = snapshot("far", "s1", &[("A", "The fee is $10."), ("B", "No change.")]);
        let new = snapshot("far", "s2", &[("A", "The fee is $10."), ("C", "New rule.")]);

        let cs = diff(&old, &new, &DiffOptions::default()).unwrap();
        let kinds: Vec<(ChangeKind, &str)> = cs
            .changes
            .iter()
            .map(|c| (c.kind, c.section_id.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![(ChangeKind::Added, "C"), (ChangeKind::Removed, "B")]
        );
        assert_eq!(cs.changes[0].old_content, "");
        assert_eq!(cs.changes[1].new_content, "");
        assert_eq!(cs.count(ChangeKind::Modified), 0);
    }

    #[test]
    fn test_modified_below_threshold() {
        let old = snapshot("far", "s1", &[("A", "Submit by March 1.")]);
        let new = snapshot("far", "s2", &[("A", "Submit by March 15.")]);

        let cs = diff(&old, &new, &DiffOptions::with_threshold(0.95)).unwrap();
        assert_eq!(cs.len(), 1);
        let change = &cs.changes[0];
        assert_eq!(change.kind, ChangeKind::Modified);
        let score = change.similarity.unwrap();
        assert!(score < 0.95);
        assert_eq!(change.summary, "Section modified: A (similarity: 0.75)");
    }

    #[test]
    fn test_low_threshold_suppresses_edit() {
        let old = snapshot("far", "s1", &[("A", "Submit by March 1.")]);
        let new = snapshot("far", "s2", &[("A", "Submit by March 15.")]);

        let cs = diff(&old, &new, &DiffOptions::with_threshold(0.5)).unwrap();
        assert!(cs.is_empty());
    }

    #[test]
    fn test_self_diff_is_empty() {
        let a = snapshot("far", "s1", &[("A", "x"), ("B", "y")]);
        let cs = diff(&a, &a, &DiffOptions::default()).unwrap();
        assert!(cs.is_empty());
        assert_eq!(cs.source_version, cs.target_version);
    }

    #[test]
    fn test_equal_fingerprint_short_circuits() {
        let old = snapshot("far", "s1", &[("A", "x")]);
        let mut new = snapshot("far", "s2", &[("A", "x")]);
        // Sections disagree but the fingerprint says identical
        new.sections = SectionMap::from_pairs([("Z", "other")]).unwrap();
        let cs = diff(&old, &new, &DiffOptions::default()).unwrap();
        assert!(cs.is_empty());
    }

    #[test]
    fn test_document_mismatch_rejected() {
        let old = snapshot("far", "s1", &[("A", "x")]);
        let new = snapshot("dfars", "s2", &[("A", "x")]);
        let err = diff(&old, &new, &DiffOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DocumentMismatch);
        assert_eq!(err.op(), Some("diff"));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let a = snapshot("far", "s1", &[("A", "x")]);
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let err = diff(&a, &a, &DiffOptions::with_threshold(bad)).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidThreshold);
        }
        assert!(diff(&a, &a, &DiffOptions::with_threshold(1.0)).is_ok());
    }

    #[test]
    fn test_groups_sorted_by_section_id() {
        let old = snapshot(
            "far",
            "s1",
            &[("r2", "gone"), ("r1", "gone"), ("m2", "alpha beta"), ("m1", "one two")],
        );
        let new = snapshot(
            "far",
            "s2",
            &[("a2", "new"), ("a1", "new"), ("m2", "gamma delta"), ("m1", "three four")],
        );
        let cs = diff(&old, &new, &DiffOptions::default()).unwrap();
        let ids: Vec<&str> = cs.changes.iter().map(|c| c.section_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "r1", "r2", "m1", "m2"]);
    }
}
