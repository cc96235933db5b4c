//! Markdown rendering of a [`StructuredReport`].
//!
//! Informational only; the structured report stays the source of truth.

use crate::diff::ChangeKind;
use crate::report::model::StructuredReport;

pub const NO_CHANGES_MESSAGE: &str = "No significant changes detected between versions.";

/// Render a report as Markdown.
pub fn render_markdown(report: &StructuredReport) -> String {
    let mut out = String::new();

    out.push_str("# Regulation Change Report\n\n");
    out.push_str(&format!(
        "**From**: {} (`{}`)  \n**To**: {} (`{}`)  \n**Threshold**: {:.2}\n\n",
        report.source_version.version_label,
        short(&report.source_version.fingerprint),
        report.target_version.version_label,
        short(&report.target_version.fingerprint),
        report.threshold,
    ));

    if report.is_empty() {
        out.push_str(&format!("_{NO_CHANGES_MESSAGE}_\n"));
        return out;
    }

    out.push_str(&format!(
        "Total changes detected: {}\n\n",
        report.summary.total
    ));

    for (title, ids) in [
        ("New Sections Added", &report.sections.added),
        ("Sections Removed", &report.sections.removed),
        ("Sections Modified", &report.sections.modified),
    ] {
        if ids.is_empty() {
            continue;
        }
        out.push_str(&format!("## {title} ({})\n", ids.len()));
        for id in ids {
            out.push_str(&format!("- {id}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Detailed Change Analysis\n\n");
    for entry in &report.entries {
        out.push_str(&format!(
            "### Change {}: {}\n\n",
            entry.index, entry.section_id
        ));
        out.push_str(&format!("**Type:** {}\n\n", entry.kind.title()));
        if let Some(score) = entry.similarity {
            out.push_str(&format!("**Similarity:** {score:.2}\n\n"));
        }
        out.push_str(&format!("**Explanation:**\n{}\n\n", entry.explanation));

        if entry.kind == ChangeKind::Modified {
            if let Some(lines) = &entry.diff_lines {
                out.push_str("**Key Differences:**\n```diff\n");
                for line in lines {
                    out.push_str(line);
                    out.push('\n');
                }
                if entry.diff_truncated {
                    out.push_str("...\n");
                }
                out.push_str("```\n\n");
            }
        }
        out.push_str("---\n\n");
    }

    out
}

fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Change, ChangeSet};
    use crate::model::VersionRef;
    use crate::report::builder::{build_report, ReportOptions};
    use crate::report::enrich::NoEnricher;

    fn version(label: &str) -> VersionRef {
        VersionRef {
            snapshot_id: label.to_string(),
            version_label: label.to_string(),
            fingerprint: "0123456789abcdef0123".to_string(),
        }
    }

    fn report(changes: Vec<Change>) -> StructuredReport {
        let cs = ChangeSet {
            source_version: version("FAC 2025-01"),
            target_version: version("FAC 2025-02"),
            threshold: 0.95,
            changes,
        };
        build_report(&cs, &NoEnricher, &ReportOptions::default())
    }

    #[test]
    fn test_render_lists_and_details() {
        let md = render_markdown(&report(vec![
            Change::added("part-52", "New rule."),
            Change::modified("part-1", "Submit by March 1.", "Submit by March 15.", 0.75),
        ]));

        assert!(md.contains("**From**: FAC 2025-01 (`0123456789ab`)"));
        assert!(md.contains("Total changes detected: 2"));
        assert!(md.contains("## New Sections Added (1)\n- part-52"));
        assert!(!md.contains("## Sections Removed"));
        assert!(md.contains("### Change 2: part-1"));
        assert!(md.contains("**Type:** Modified"));
        assert!(md.contains("**Similarity:** 0.75"));
        assert!(md.contains("+Submit by March 15."));
    }

    #[test]
    fn test_render_empty_report() {
        let md = render_markdown(&report(Vec::new()));
        assert!(md.contains(NO_CHANGES_MESSAGE));
        assert!(!md.contains("Detailed Change Analysis"));
    }
}
