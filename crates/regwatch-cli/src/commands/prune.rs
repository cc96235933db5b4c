//! Prune command: apply the retention policy

use crate::commands::{print_json, Context, OutputFormat};
use clap::Args;
use regwatch_store::retention::cutoff_for_days;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Days of history to keep (defaults to retention.days_to_keep)
    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

pub fn execute(ctx: &Context, args: PruneArgs) -> Result<(), Box<dyn std::error::Error>> {
    let days = args.days.unwrap_or(ctx.config.retention.days_to_keep);
    if days == 0 {
        return Err("--days must be at least 1".into());
    }

    let store = ctx.open_store()?;
    let cutoff = cutoff_for_days(chrono::Utc::now().timestamp_millis(), days);
    let report = store.prune_before(cutoff)?;

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Markdown => {
            println!(
                "Pruned {} snapshots ({} capture records) not captured in the last {} days.",
                report.snapshots_deleted, report.captures_deleted, days
            );
            Ok(())
        }
    }
}
