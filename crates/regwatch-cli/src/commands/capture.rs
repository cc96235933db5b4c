//! Capture command: record a document export and report changes

use crate::commands::{print_json, Context, OutputFormat, DEFAULT_DOCUMENT};
use clap::Args;
use regwatch_core::report::{render_markdown, NO_CHANGES_MESSAGE};
use regwatch_engine::commands::capture::{run_capture, CaptureOutcome};
use regwatch_engine::commands::compare::Comparison;
use regwatch_engine::{enrichment, source};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Document export (JSON) to record
    #[arg(long)]
    pub file: PathBuf,

    #[arg(long, default_value = DEFAULT_DOCUMENT)]
    pub document: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CaptureJson<'a> {
    request_id: &'a str,
    snapshot_id: &'a str,
    version_label: &'a str,
    is_new: bool,
    comparison: Option<&'a Comparison>,
}

pub fn execute(ctx: &Context, args: CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let capture = source::load_document(&args.file, &args.document)?;
    let store = ctx.open_store()?;
    let enricher = enrichment::from_config(&ctx.config.enrichment);

    let outcome = run_capture(&store, &capture, &ctx.config, enricher.as_ref())?;

    match args.format {
        OutputFormat::Json => print_json(&CaptureJson {
            request_id: outcome.request_id.as_str(),
            snapshot_id: &outcome.record.snapshot.snapshot_id,
            version_label: &outcome.record.snapshot.version_label,
            is_new: outcome.record.is_new,
            comparison: outcome.comparison.as_ref(),
        }),
        OutputFormat::Markdown => {
            println!("{}", describe(&outcome));
            Ok(())
        }
    }
}

fn describe(outcome: &CaptureOutcome) -> String {
    let snapshot = &outcome.record.snapshot;
    match &outcome.comparison {
        None => format!(
            "No new content: capture matches stored version {} ({}).",
            snapshot.version_label, snapshot.snapshot_id
        ),
        Some(Comparison::NoHistory) | Some(Comparison::SingleVersion(_)) => format!(
            "Recorded first version {} ({}); nothing to compare yet.",
            snapshot.version_label, snapshot.snapshot_id
        ),
        Some(Comparison::NoChanges(_)) => NO_CHANGES_MESSAGE.to_string(),
        Some(Comparison::Changed(report)) => render_markdown(report),
    }
}
