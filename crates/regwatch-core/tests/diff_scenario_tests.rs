#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::snapshot;
use regwatch_core::diff::{diff, ChangeKind, DiffOptions};
use regwatch_core::errors::ExErrorKind;
use regwatch_core::similarity::Granularity;

#[test]
fn test_scenario_add_remove_with_unchanged_section() {
    let old = snapshot("s1", &[("A", "The fee is $10."), ("B", "No change.")]);
    let new = snapshot("s2", &[("A", "The fee is $10."), ("C", "New rule.")]);

    let cs = diff(&old, &new, &DiffOptions::default()).unwrap();

    assert_eq!(cs.ids(ChangeKind::Added), vec!["C"]);
    assert_eq!(cs.ids(ChangeKind::Removed), vec!["B"]);
    assert!(cs.ids(ChangeKind::Modified).is_empty());
    assert_eq!(cs.changes[0].new_content, "New rule.");
    assert_eq!(cs.changes[1].old_content, "No change.");
    assert!(cs.changes.iter().all(|c| c.similarity.is_none()));
}

#[test]
fn test_scenario_short_edit_reported_at_default_threshold() {
    let old = snapshot("s1", &[("A", "Submit by March 1.")]);
    let new = snapshot("s2", &[("A", "Submit by March 15.")]);

    let cs = diff(&old, &new, &DiffOptions::with_threshold(0.95)).unwrap();

    assert_eq!(cs.len(), 1);
    let change = &cs.changes[0];
    assert_eq!(change.kind, ChangeKind::Modified);
    assert_eq!(change.section_id, "A");
    assert_eq!(change.old_content, "Submit by March 1.");
    assert_eq!(change.new_content, "Submit by March 15.");
    assert!(change.similarity.unwrap() < 0.95);
}

#[test]
fn test_scenario_short_edit_suppressed_at_low_threshold() {
    let old = snapshot("s1", &[("A", "Submit by March 1.")]);
    let new = snapshot("s2", &[("A", "Submit by March 15.")]);

    let cs = diff(&old, &new, &DiffOptions::with_threshold(0.5)).unwrap();

    assert!(cs.is_empty());
    assert_eq!(cs.threshold, 0.5);
}

#[test]
fn test_reformatting_only_is_noise() {
    let old = snapshot("s1", &[("A", "Contractors shall\nsubmit invoices monthly.")]);
    let new = snapshot("s2", &[("A", "Contractors shall submit  invoices monthly.")]);

    let cs = diff(&old, &new, &DiffOptions::with_threshold(1.0)).unwrap();
    assert!(cs.is_empty());
}

#[test]
fn test_char_granularity_is_more_lenient_on_short_edits() {
    let old = snapshot("s1", &[("A", "Submit by March 1.")]);
    let new = snapshot("s2", &[("A", "Submit by March 15.")]);
    let options = DiffOptions {
        threshold: 0.95,
        granularity: Granularity::Chars,
    };

    let cs = diff(&old, &new, &options).unwrap();
    assert!(cs.is_empty());
}

#[test]
fn test_change_set_carries_version_refs() {
    let old = snapshot("s1", &[("A", "x")]);
    let new = snapshot("s2", &[("A", "y")]);

    let cs = diff(&old, &new, &DiffOptions::default()).unwrap();

    assert_eq!(cs.source_version.snapshot_id, "s1");
    assert_eq!(cs.target_version.snapshot_id, "s2");
    assert_eq!(cs.source_version.fingerprint, old.content_fingerprint);
    assert_eq!(cs.target_version.version_label, "label-s2");
}

#[test]
fn test_determinism_repeated_diff() {
    let old = snapshot(
        "s1",
        &[("A", "alpha beta gamma"), ("B", "one two three"), ("D", "gone")],
    );
    let new = snapshot(
        "s2",
        &[("A", "alpha delta gamma"), ("B", "one two four"), ("E", "new")],
    );

    let first = diff(&old, &new, &DiffOptions::default()).unwrap();
    let second = diff(&old, &new, &DiffOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_mismatched_documents_rejected() {
    let old = snapshot("s1", &[("A", "x")]);
    let mut new = snapshot("s2", &[("A", "y")]);
    new.document_id = "dfars".to_string();

    let err = diff(&old, &new, &DiffOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DocumentMismatch);
    assert!(err.kind().is_validation());
}
