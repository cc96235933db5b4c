//! Integration tests for capture and compare orchestration.
//!
//! All tests run against a real SQLite store in a TempDir.

use regwatch_core::report::{ExplanationSource, FnEnricher, NoEnricher};
use regwatch_core::{
    Capture, Change, ChangeKind, ExError, ExErrorKind, RegwatchConfig, SectionMap, SnapshotStore,
};
use regwatch_engine::commands::capture::run_capture;
use regwatch_engine::commands::compare::{compare_latest, compare_snapshots, Comparison};
use regwatch_store::SqliteSnapshotStore;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn setup() -> (TempDir, SqliteSnapshotStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteSnapshotStore::open(temp_dir.path().join("test.db")).unwrap();
    (temp_dir, store)
}

fn capture(label: &str, pairs: &[(&str, &str)]) -> Capture {
    Capture::new(
        "far",
        label,
        "2025-01-01",
        SectionMap::from_pairs(pairs.iter().copied()).unwrap(),
    )
}

fn config_with_threshold(threshold: f64) -> RegwatchConfig {
    let mut config = RegwatchConfig::default();
    config.diff.threshold = threshold;
    config
}

fn expect_report(comparison: Option<Comparison>) -> regwatch_core::StructuredReport {
    match comparison {
        Some(Comparison::Changed(report)) => report,
        Some(other) => panic!("expected a report, got {}", other.as_str()),
        None => panic!("expected a comparison"),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_second_capture_reports_all_change_kinds() {
    let (_dir, store) = setup();
    let config = RegwatchConfig::default();
    run_capture(
        &store,
        &capture("v1", &[("A", "Submit by March 1."), ("B", "Old rule.")]),
        &config,
        &NoEnricher,
    )
    .unwrap();

    let outcome = run_capture(
        &store,
        &capture("v2", &[("A", "Submit by March 15."), ("C", "New rule.")]),
        &config,
        &NoEnricher,
    )
    .unwrap();

    let report = expect_report(outcome.comparison);
    assert_eq!(report.sections.added, vec!["C".to_string()]);
    assert_eq!(report.sections.removed, vec!["B".to_string()]);
    assert_eq!(report.sections.modified, vec!["A".to_string()]);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.source_version.version_label, "v1");
    assert_eq!(report.target_version.version_label, "v2");
    assert!(report
        .entries
        .iter()
        .all(|e| e.explanation_source == ExplanationSource::FallbackUnavailable));
}

#[test]
fn test_low_threshold_hides_small_edit() {
    let (_dir, store) = setup();
    let config = config_with_threshold(0.5);
    store
        .record(&capture("v1", &[("A", "Submit by March 1.")]))
        .unwrap();
    store
        .record(&capture("v2", &[("A", "Submit by March 15.")]))
        .unwrap();

    match compare_latest(&store, "far", &config, &NoEnricher).unwrap() {
        Comparison::NoChanges(change_set) => {
            assert!(change_set.is_empty());
            assert_eq!(change_set.threshold, 0.5);
        }
        other => panic!("expected no changes, got {}", other.as_str()),
    }
}

#[test]
fn test_one_failing_explanation_does_not_affect_others() {
    let (_dir, store) = setup();
    let config = RegwatchConfig::default();
    store
        .record(&capture("v1", &[("A", "alpha"), ("B", "beta")]))
        .unwrap();
    store
        .record(&capture("v2", &[("A", "gamma"), ("B", "delta")]))
        .unwrap();

    let enricher = FnEnricher::new("flaky", |c: &Change| {
        if c.section_id == "A" {
            Err(ExError::new(ExErrorKind::ExternalService).with_message("quota exceeded"))
        } else {
            Ok(Some(format!("{} was rewritten", c.section_id)))
        }
    });

    let comparison = compare_latest(&store, "far", &config, &enricher).unwrap();
    let report = comparison.report().unwrap();
    let a = &report.entries[0];
    let b = &report.entries[1];

    assert_eq!(a.section_id, "A");
    assert_eq!(a.explanation_source, ExplanationSource::FallbackFailed);
    assert_eq!(a.explanation, a.summary);
    assert_eq!(b.explanation_source, ExplanationSource::Enriched);
    assert_eq!(b.explanation, "B was rewritten");
    assert_eq!(report.enricher, "flaky");
}

#[test]
fn test_revert_reports_change_back() {
    let (_dir, store) = setup();
    let config = RegwatchConfig::default();
    run_capture(&store, &capture("v1", &[("A", "one two")]), &config, &NoEnricher).unwrap();
    run_capture(&store, &capture("v2", &[("A", "three four")]), &config, &NoEnricher).unwrap();
    let outcome = run_capture(
        &store,
        &capture("v1 again", &[("A", "one two")]),
        &config,
        &NoEnricher,
    )
    .unwrap();

    // Reverted content is not new, so the run does not compare
    assert!(!outcome.record.is_new);
    assert!(outcome.comparison.is_none());

    // But the latest pair now runs v2 -> v1
    let report = compare_latest(&store, "far", &config, &NoEnricher)
        .unwrap()
        .report()
        .cloned()
        .unwrap();
    assert_eq!(report.source_version.version_label, "v2");
    assert_eq!(report.target_version.version_label, "v1");
}

#[test]
fn test_compare_explicit_snapshots_in_either_direction() {
    let (_dir, store) = setup();
    let config = RegwatchConfig::default();
    let v1 = store.record(&capture("v1", &[("A", "x")])).unwrap();
    let v2 = store
        .record(&capture("v2", &[("A", "x"), ("B", "y")]))
        .unwrap();

    let forward = compare_snapshots(
        &store,
        "far",
        &v1.snapshot.snapshot_id,
        &v2.snapshot.snapshot_id,
        &config,
        &NoEnricher,
    )
    .unwrap();
    let backward = compare_snapshots(
        &store,
        "far",
        &v2.snapshot.snapshot_id,
        &v1.snapshot.snapshot_id,
        &config,
        &NoEnricher,
    )
    .unwrap();

    assert_eq!(forward.report().unwrap().entries[0].kind, ChangeKind::Added);
    assert_eq!(backward.report().unwrap().entries[0].kind, ChangeKind::Removed);
}

#[test]
fn test_snapshot_of_other_document_is_not_found() {
    let (_dir, store) = setup();
    let far = store.record(&capture("v1", &[("A", "x")])).unwrap();
    let dfars = store
        .record(&Capture::new(
            "dfars",
            "d1",
            "2025-01-01",
            SectionMap::from_pairs([("A", "y")]).unwrap(),
        ))
        .unwrap();

    let err = compare_snapshots(
        &store,
        "far",
        &far.snapshot.snapshot_id,
        &dfars.snapshot.snapshot_id,
        &RegwatchConfig::default(),
        &NoEnricher,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_capture_run_id_reaches_capture_log() {
    let (_dir, store) = setup();
    let outcome = run_capture(
        &store,
        &capture("v1", &[("A", "x")]),
        &RegwatchConfig::default(),
        &NoEnricher,
    )
    .unwrap();

    let entries = store.list_captures(Some("far"), 1).unwrap();
    assert_eq!(entries[0].run_id, outcome.request_id.as_str());
}
