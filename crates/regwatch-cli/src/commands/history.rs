//! History command: list stored versions of a document

use crate::commands::{print_json, Context, OutputFormat, DEFAULT_DOCUMENT};
use clap::Args;
use regwatch_core::SnapshotStore;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, default_value = DEFAULT_DOCUMENT)]
    pub document: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

pub fn execute(ctx: &Context, args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let history = store.history(&args.document)?;

    if args.format == OutputFormat::Json {
        return print_json(&history);
    }

    if history.is_empty() {
        println!("No versions of {} have been captured.", args.document);
        return Ok(());
    }

    println!("# History: {}", args.document);
    println!();
    for summary in &history {
        let marker = if summary.is_latest { " (latest)" } else { "" };
        println!(
            "- {} {} effective {}, {} sections, first captured {}{}",
            summary.snapshot_id,
            summary.version_label,
            summary.effective_date,
            summary.section_count,
            summary.captured_at,
            marker
        );
    }
    Ok(())
}
