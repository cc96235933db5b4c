//! Report builder.
//!
//! Turns a `ChangeSet` into a `StructuredReport`: counts by kind, affected
//! section ids, and one entry per change carrying an explanation and, for
//! modified sections, a bounded unified diff.
//!
//! Enrichment is consulted once per change through the [`Enricher`] trait.
//! Absence or failure for one change falls back to its mechanical summary
//! and never aborts the report.

pub mod builder;
pub mod enrich;
pub mod line_diff;
pub mod markdown;
pub mod model;

pub use builder::{build_report, ReportOptions};
pub use enrich::{Enricher, FnEnricher, NoEnricher};
pub use line_diff::unified_diff;
pub use markdown::{render_markdown, NO_CHANGES_MESSAGE};
pub use model::{ExplanationSource, ReportEntry, ReportSections, ReportSummary, StructuredReport};
