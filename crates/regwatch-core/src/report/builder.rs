//! Report assembly.

use crate::diff::{Change, ChangeKind, ChangeSet};
use crate::report::enrich::Enricher;
use crate::report::line_diff::unified_diff;
use crate::report::model::{
    ExplanationSource, ReportEntry, ReportSections, ReportSummary, StructuredReport,
};
use crate::{log_op_end, log_op_start};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Presentation limits for rendered diffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Lines kept from each modified section's unified diff, headers included
    pub max_diff_lines: usize,
    /// Unchanged lines shown around each hunk
    pub context_lines: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_diff_lines: 20,
            context_lines: 3,
        }
    }
}

/// Build a structured report, enriching each change independently.
///
/// Never fails: an enricher error, panic or empty answer for one change falls
/// back to that change's mechanical summary and leaves the other entries
/// alone.
pub fn build_report(
    change_set: &ChangeSet,
    enricher: &dyn Enricher,
    options: &ReportOptions,
) -> StructuredReport {
    let start = Instant::now();
    log_op_start!(
        "build_report",
        change_count = change_set.len(),
        enricher = enricher.name()
    );

    let entries: Vec<ReportEntry> = change_set
        .changes
        .iter()
        .enumerate()
        .map(|(i, change)| build_entry(i + 1, change, enricher, options))
        .collect();

    let summary = ReportSummary {
        added: change_set.count(ChangeKind::Added),
        removed: change_set.count(ChangeKind::Removed),
        modified: change_set.count(ChangeKind::Modified),
        total: change_set.len(),
    };
    let sections = ReportSections {
        added: change_set.ids(ChangeKind::Added),
        removed: change_set.ids(ChangeKind::Removed),
        modified: change_set.ids(ChangeKind::Modified),
    };

    let report = StructuredReport {
        source_version: change_set.source_version.clone(),
        target_version: change_set.target_version.clone(),
        threshold: change_set.threshold,
        enricher: enricher.name().to_string(),
        summary,
        sections,
        entries,
    };

    log_op_end!(
        "build_report",
        duration_ms = start.elapsed().as_millis() as u64,
        fallback_count = report.fallback_count()
    );
    report
}

fn build_entry(
    index: usize,
    change: &Change,
    enricher: &dyn Enricher,
    options: &ReportOptions,
) -> ReportEntry {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| enricher.explain(change)));
    let (explanation, explanation_source) = match outcome {
        Ok(Ok(Some(text))) if !text.trim().is_empty() => {
            (text.trim().to_string(), ExplanationSource::Enriched)
        }
        Ok(Ok(_)) => (
            change.summary.clone(),
            ExplanationSource::FallbackUnavailable,
        ),
        Ok(Err(e)) => {
            tracing::warn!(
                component = module_path!(),
                op = "build_report",
                section_id = %change.section_id,
                err_code = e.code(),
                err_message = e.message(),
                "enrichment failed, using mechanical summary"
            );
            (change.summary.clone(), ExplanationSource::FallbackFailed)
        }
        Err(_) => {
            tracing::warn!(
                component = module_path!(),
                op = "build_report",
                section_id = %change.section_id,
                enricher = enricher.name(),
                "enricher panicked, using mechanical summary"
            );
            (change.summary.clone(), ExplanationSource::FallbackFailed)
        }
    };

    // Texts differing only in line terminators have no line diff to show
    let (diff_lines, diff_truncated) = match change.kind {
        ChangeKind::Modified => {
            let mut lines = unified_diff(
                &change.old_content,
                &change.new_content,
                options.context_lines,
            );
            let truncated = lines.len() > options.max_diff_lines;
            lines.truncate(options.max_diff_lines);
            if lines.is_empty() {
                (None, false)
            } else {
                (Some(lines), truncated)
            }
        }
        ChangeKind::Added | ChangeKind::Removed => (None, false),
    };

    ReportEntry {
        index,
        kind: change.kind,
        section_id: change.section_id.clone(),
        similarity: change.similarity,
        summary: change.summary.clone(),
        explanation,
        explanation_source,
        diff_lines,
        diff_truncated,
    }
}
