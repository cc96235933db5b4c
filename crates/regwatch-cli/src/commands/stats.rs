//! Stats command

use crate::commands::{print_json, Context, OutputFormat};
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

pub fn execute(ctx: &Context, args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if args.format == OutputFormat::Json {
        return print_json(&stats);
    }

    println!("Database:   {}", ctx.db_path.display());
    println!("Snapshots:  {}", stats.snapshot_count);
    println!(
        "Captures:   {} ({} duplicate)",
        stats.capture_count, stats.duplicate_capture_count
    );
    for doc in &stats.documents {
        println!(
            "Latest {}: {} effective {} ({})",
            doc.document_id, doc.version_label, doc.effective_date, doc.snapshot_id
        );
    }
    Ok(())
}
