//! Content migration command implementation.
//!
//! Responsibilities:
//! - Scan a content root and upsert one collection's files by slug.
//!
//! Does NOT handle:
//! - Schema changes; run `schema generate` and deploy the collection first.
//!
//! Invariants:
//! - Per-file failures are listed after the run and the command exits 5.
//! - `--dry-run` performs lookups but no writes.

use anyhow::Result;
use clap::Subcommand;
use cms_client::{MigrationOptions, migrate_content};
use std::path::PathBuf;
use tracing::info;

use crate::cancellation::CancellationToken;
use crate::commands::{build_client_from_config, finish_run};
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Upsert content files into a collection by slug
    Migrate {
        /// Content root; first-level directories name the collections
        #[arg(long, value_name = "DIR")]
        root: PathBuf,
        /// Target collection slug
        #[arg(long)]
        collection: String,
        /// Content directory to read (defaults to the collection slug)
        #[arg(long)]
        source: Option<String>,
        /// Report what would be written without writing
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn run(
    config: cms_config::Config,
    command: ContentCommand,
    output_format: &str,
    output_file: Option<PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;

    match command {
        ContentCommand::Migrate {
            root,
            collection,
            source,
            dry_run,
        } => {
            let mut options = MigrationOptions::new(collection);
            options.source = source;
            options.dry_run = dry_run;
            info!(
                root = %root.display(),
                collection = %options.collection,
                dry_run,
                "Migrating content"
            );

            let mut client = build_client_from_config(&config)?;
            let spinner = Spinner::new(!quiet, format!("Migrating into {}", options.collection));
            let report = cancellable!(migrate_content(&mut client, &root, &options), cancel)?;
            spinner.finish(&format!(
                "{} processed, {} failed",
                report.processed(),
                report.failures.len()
            ));

            let output = get_formatter(format).format_migration_report(&report)?;
            output_result(&output, format, output_file.as_ref())?;
            finish_run("Content migration", report.failures.len())
        }
    }
}
