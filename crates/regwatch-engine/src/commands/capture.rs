//! Capture orchestration: record a freshly fetched document version and,
//! when it is new content, report what changed since the previous version.
//!
//! Every run carries a `RequestId`. It is written to the capture log and
//! attached to any error the run returns.

#![allow(clippy::result_large_err)]

use crate::commands::compare::{compare_latest, Comparison};
use regwatch_core::errors::Result;
use regwatch_core::{
    log_op_end, log_op_error, log_op_start, Capture, Enricher, RecordOutcome, RegwatchConfig,
    SnapshotStore,
};
use regwatch_core_types::RequestId;
use std::time::Instant;

/// Result of one capture run.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub request_id: RequestId,
    pub record: RecordOutcome,
    /// `None` when the capture repeated already stored content
    pub comparison: Option<Comparison>,
}

/// Record `capture` and compare it against the previous distinct version.
///
/// A duplicate capture is still logged by the store but skips the
/// comparison. If the comparison fails the capture stays recorded.
///
/// # Errors
///
/// Validation or persistence errors from the store, or diff validation
/// errors. All carry the run's request id.
pub fn run_capture(
    store: &dyn SnapshotStore,
    capture: &Capture,
    config: &RegwatchConfig,
    enricher: &dyn Enricher,
) -> Result<CaptureOutcome> {
    let request_id = RequestId::new();
    let start = Instant::now();
    log_op_start!(
        "capture",
        request_id = %request_id,
        document_id = %capture.document_id,
        version_label = %capture.version_label
    );

    let result = store
        .record_for_run(capture, &request_id)
        .and_then(|record| {
            let comparison = if record.is_new {
                Some(compare_latest(
                    store,
                    &capture.document_id,
                    config,
                    enricher,
                )?)
            } else {
                None
            };
            Ok((record, comparison))
        });

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok((record, comparison)) => {
            log_op_end!(
                "capture",
                duration_ms = duration_ms,
                request_id = %request_id,
                snapshot_id = %record.snapshot.snapshot_id,
                is_new = record.is_new,
                outcome = comparison.as_ref().map_or("duplicate", Comparison::as_str)
            );
            Ok(CaptureOutcome {
                request_id,
                record,
                comparison,
            })
        }
        Err(e) => {
            log_op_error!(
                "capture",
                e.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(e.with_request_id(request_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regwatch_core::report::NoEnricher;
    use regwatch_core::{ExErrorKind, MemorySnapshotStore, SectionMap};

    fn capture(label: &str, pairs: &[(&str, &str)]) -> Capture {
        Capture::new(
            "far",
            label,
            "2025-01-01",
            SectionMap::from_pairs(pairs.iter().copied()).unwrap(),
        )
    }

    #[test]
    fn test_first_capture_has_single_version() {
        let store = MemorySnapshotStore::new();
        let outcome = run_capture(
            &store,
            &capture("v1", &[("A", "x")]),
            &RegwatchConfig::default(),
            &NoEnricher,
        )
        .unwrap();

        assert!(outcome.record.is_new);
        assert!(matches!(
            outcome.comparison,
            Some(Comparison::SingleVersion(_))
        ));
    }

    #[test]
    fn test_duplicate_capture_skips_comparison() {
        let store = MemorySnapshotStore::new();
        let config = RegwatchConfig::default();
        run_capture(&store, &capture("v1", &[("A", "x")]), &config, &NoEnricher).unwrap();
        let outcome =
            run_capture(&store, &capture("v1", &[("A", "x")]), &config, &NoEnricher).unwrap();

        assert!(!outcome.record.is_new);
        assert!(outcome.comparison.is_none());
    }

    #[test]
    fn test_failed_capture_carries_request_id() {
        let store = MemorySnapshotStore::new();
        let bad = Capture::new(" ", "v1", "2025-01-01", SectionMap::new());
        let err = run_capture(&store, &bad, &RegwatchConfig::default(), &NoEnricher).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(err.request_id().is_some());
    }
}
