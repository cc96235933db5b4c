//! Compare command: report on the latest change or on two chosen snapshots

use crate::commands::{print_json, Context, OutputFormat, DEFAULT_DOCUMENT};
use clap::Args;
use regwatch_core::report::{render_markdown, NO_CHANGES_MESSAGE};
use regwatch_engine::commands::compare::{compare_latest, compare_snapshots, Comparison};
use regwatch_engine::enrichment;

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[arg(long, default_value = DEFAULT_DOCUMENT)]
    pub document: String,

    /// Old snapshot id (requires --to)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// New snapshot id (requires --from)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Similarity threshold in (0, 1]; overrides diff.threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

pub fn execute(ctx: &Context, args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ctx.config.clone();
    if let Some(threshold) = args.threshold {
        config.diff.threshold = threshold;
    }
    let store = ctx.open_store()?;
    let enricher = enrichment::from_config(&config.enrichment);

    let comparison = match (&args.from, &args.to) {
        (Some(from), Some(to)) => compare_snapshots(
            &store,
            &args.document,
            from,
            to,
            &config,
            enricher.as_ref(),
        )?,
        _ => compare_latest(&store, &args.document, &config, enricher.as_ref())?,
    };

    match args.format {
        OutputFormat::Json => print_json(&comparison),
        OutputFormat::Markdown => {
            println!("{}", describe(&args.document, &comparison));
            Ok(())
        }
    }
}

fn describe(document_id: &str, comparison: &Comparison) -> String {
    match comparison {
        Comparison::NoHistory => format!("No versions of {} have been captured.", document_id),
        Comparison::SingleVersion(snapshot) => format!(
            "Only one version of {} is stored ({}); nothing to compare.",
            document_id, snapshot.version_label
        ),
        Comparison::NoChanges(_) => NO_CHANGES_MESSAGE.to_string(),
        Comparison::Changed(report) => render_markdown(report),
    }
}
