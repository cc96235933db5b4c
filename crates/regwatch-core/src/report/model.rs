//! Structured report types.
//!
//! The report is a plain serde value; rendering and delivery belong to the
//! sink (see [`crate::report::markdown`] for the Markdown rendering).

use crate::diff::ChangeKind;
use crate::model::VersionRef;
use serde::{Deserialize, Serialize};

/// Where an entry's explanation text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    /// Text returned by the enrichment collaborator
    Enriched,
    /// Enricher had nothing to say (absent or blank); mechanical summary used
    FallbackUnavailable,
    /// Enricher failed for this change; mechanical summary used
    FallbackFailed,
}

/// Change counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub total: usize,
}

/// Affected section ids by kind, each in change-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSections {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

/// One rendered change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 1-based position in the change set
    pub index: usize,
    pub kind: ChangeKind,
    pub section_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub similarity: Option<f64>,
    /// Mechanical summary of the change
    pub summary: String,
    /// Never empty
    pub explanation: String,
    pub explanation_source: ExplanationSource,
    /// Unified line diff; present for modified entries with differing lines
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diff_lines: Option<Vec<String>>,
    #[serde(default)]
    pub diff_truncated: bool,
}

/// Report over one change set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub source_version: VersionRef,
    pub target_version: VersionRef,
    pub threshold: f64,
    /// Name of the enricher that was consulted
    pub enricher: String,
    pub summary: ReportSummary,
    pub sections: ReportSections,
    pub entries: Vec<ReportEntry>,
}

impl StructuredReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose explanation fell back to the mechanical summary
    pub fn fallback_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.explanation_source != ExplanationSource::Enriched)
            .count()
    }
}
