//! Per-change timeout boundary around an enricher.
//!
//! Each `explain` call runs on its own worker thread and the caller waits
//! at most `timeout`. A worker that overruns is left to finish in the
//! background; its answer is discarded.

#![allow(clippy::result_large_err)]

use regwatch_core::errors::{ExError, ExErrorKind, Result};
use regwatch_core::{Change, Enricher};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct TimeoutEnricher {
    inner: Arc<dyn Enricher>,
    timeout: Duration,
}

impl TimeoutEnricher {
    pub fn new(inner: Arc<dyn Enricher>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Enricher for TimeoutEnricher {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn explain(&self, change: &Change) -> Result<Option<String>> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned = change.clone();

        thread::Builder::new()
            .name("regwatch-enrich".to_string())
            .spawn(move || {
                // The receiver may be gone after a timeout
                let _ = tx.send(inner.explain(&owned));
            })
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("enrich")
                    .with_section_id(change.section_id.clone())
                    .with_message(format!("Failed to spawn enrichment worker: {}", e))
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ExError::new(ExErrorKind::Timeout)
                .with_op("enrich")
                .with_section_id(change.section_id.clone())
                .with_message(format!(
                    "Enricher {} did not answer within {} ms",
                    self.inner.name(),
                    self.timeout.as_millis()
                ))),
            // Sender dropped without sending: the worker panicked
            Err(RecvTimeoutError::Disconnected) => Err(ExError::new(ExErrorKind::Internal)
                .with_op("enrich")
                .with_section_id(change.section_id.clone())
                .with_message(format!("Enricher {} panicked", self.inner.name()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regwatch_core::report::FnEnricher;

    fn wrap<F>(f: F, timeout_ms: u64) -> TimeoutEnricher
    where
        F: Fn(&Change) -> Result<Option<String>> + Send + Sync + 'static,
    {
        TimeoutEnricher::new(
            Arc::new(FnEnricher::new("test", f)),
            Duration::from_millis(timeout_ms),
        )
    }

    #[test]
    fn test_fast_answer_passes_through() {
        let enricher = wrap(|c: &Change| Ok(Some(format!("about {}", c.section_id))), 1_000);
        assert_eq!(
            enricher.explain(&Change::added("A", "x")).unwrap(),
            Some("about A".to_string())
        );
        assert_eq!(enricher.name(), "test");
    }

    #[test]
    fn test_slow_answer_times_out() {
        let enricher = wrap(
            |_: &Change| {
                thread::sleep(Duration::from_millis(500));
                Ok(Some("late".to_string()))
            },
            20,
        );
        let err = enricher.explain(&Change::added("A", "x")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Timeout);
        assert_eq!(err.section_id(), Some("A"));
    }

    #[test]
    fn test_panic_is_contained() {
        let enricher = wrap(|_: &Change| panic!("enricher exploded"), 1_000);
        let err = enricher.explain(&Change::added("A", "x")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Internal);
    }

    #[test]
    fn test_inner_error_passes_through() {
        let enricher = wrap(
            |_: &Change| Err(ExError::new(ExErrorKind::ExternalService)),
            1_000,
        );
        let err = enricher.explain(&Change::added("A", "x")).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ExternalService);
    }
}
