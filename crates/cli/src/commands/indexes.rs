//! Index command implementation.
//!
//! Responsibilities:
//! - List the indexes of one collection.
//! - Sync an index plan: create missing indexes, report existing and failed ones.
//!
//! Does NOT handle:
//! - Dropping or altering indexes; sync only ever creates.
//!
//! Invariants:
//! - A failed index never stops the sync; failures are listed and the command exits 5.

use anyhow::{Context, Result};
use clap::Subcommand;
use cms_client::{IndexPlan, sync_indexes};
use std::path::PathBuf;
use tracing::info;

use crate::cancellation::CancellationToken;
use crate::commands::{build_client_from_config, finish_run};
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

#[derive(Debug, Subcommand)]
pub enum IndexesCommand {
    /// List the indexes of a collection
    List {
        /// Collection slug
        collection: String,
    },
    /// Create the indexes of a plan that do not exist yet
    Sync {
        /// Index plan file (YAML)
        #[arg(long, value_name = "FILE")]
        plan: PathBuf,
        /// Only sync this collection
        #[arg(long)]
        collection: Option<String>,
        /// Report what would be created without creating anything
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn run(
    config: cms_config::Config,
    command: IndexesCommand,
    output_format: &str,
    output_file: Option<PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let formatter = get_formatter(format);
    let mut client = build_client_from_config(&config)?;

    match command {
        IndexesCommand::List { collection } => {
            info!(%collection, "Listing indexes");
            let indexes = cancellable!(client.list_indexes(&collection), cancel)?;
            let output = formatter.format_indexes(&collection, &indexes)?;
            output_result(&output, format, output_file.as_ref())
        }
        IndexesCommand::Sync {
            plan,
            collection,
            dry_run,
        } => {
            let mut index_plan = IndexPlan::from_file(&plan)
                .with_context(|| format!("Failed to load index plan {}", plan.display()))?;
            if let Some(collection) = collection.as_deref() {
                index_plan = index_plan.only(collection);
            }
            info!(
                indexes = index_plan.index_count(),
                dry_run, "Syncing indexes"
            );

            let spinner = Spinner::new(!quiet, "Syncing indexes");
            let report = cancellable!(
                async {
                    Ok::<_, anyhow::Error>(sync_indexes(&mut client, &index_plan, dry_run).await)
                },
                cancel
            )?;
            spinner.finish(&format!(
                "{} created, {} failed",
                report.created.len(),
                report.failed.len()
            ));

            let output = formatter.format_sync_report(&report)?;
            output_result(&output, format, output_file.as_ref())?;
            finish_run("Index sync", report.failed.len())
        }
    }
}
