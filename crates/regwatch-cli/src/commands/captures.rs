//! Captures command: show the capture log

use crate::commands::{print_json, Context, OutputFormat};
use clap::Args;

#[derive(Debug, Args)]
pub struct CapturesArgs {
    /// Only this document (all documents when omitted)
    #[arg(long)]
    pub document: Option<String>,

    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

pub fn execute(ctx: &Context, args: CapturesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store()?;
    let entries = store.list_captures(args.document.as_deref(), args.limit)?;

    if args.format == OutputFormat::Json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No captures recorded.");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{:>6}  {}  {}  {}  {:<9}  run {}",
            entry.seq,
            entry.captured_at,
            entry.document_id,
            entry.version_label,
            entry.status,
            entry.run_id
        );
    }
    Ok(())
}
