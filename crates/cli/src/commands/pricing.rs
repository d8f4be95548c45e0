//! Pricing API command implementation.
//!
//! Responsibilities:
//! - Fetch records from a pricing API endpoint and print them.
//! - Import fetched records into a CMS collection.
//!
//! Does NOT handle:
//! - Deduplication; every import run creates new documents.
//!
//! Invariants:
//! - `fetch` needs only the pricing API settings, never CMS credentials.
//! - A failed record is listed with its id (or `#index`) and the command exits 5.
//! - Non-object entries in the response count as failed records.

use anyhow::{Context, Result};
use clap::Subcommand;
use cms_client::{PricingClient, PricingRecords, import_records};
use cms_config::PricingConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::cancellation::CancellationToken;
use crate::commands::{build_client_from_config, finish_run};
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

#[derive(Debug, Subcommand)]
pub enum PricingCommand {
    /// Fetch and print records from a pricing API endpoint
    Fetch {
        /// Endpoint path relative to the pricing API base URL (e.g. v1/tdsps)
        endpoint: String,
    },
    /// Fetch records and create one document per record
    Import {
        /// Endpoint path relative to the pricing API base URL (e.g. v1/tdsps)
        endpoint: String,
        /// Target collection slug
        #[arg(long)]
        collection: String,
        /// Report what would be created without writing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Connection limits for the pricing client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PricingLimits {
    pub timeout: Duration,
    pub max_retries: usize,
}

async fn fetch(
    pricing: &PricingConfig,
    limits: PricingLimits,
    endpoint: &str,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<PricingRecords> {
    let client = PricingClient::new(pricing, limits.timeout, limits.max_retries)
        .context("Failed to build pricing API client")?;
    info!(base_url = client.base_url(), endpoint, "Fetching pricing records");

    let spinner = Spinner::new(!quiet, format!("Fetching {endpoint}"));
    let records = cancellable!(client.fetch_records(endpoint), cancel)?;
    spinner.finish(&format!(
        "{} records, {} rejected",
        records.records.len(),
        records.rejected.len()
    ));
    Ok(records)
}

/// `pricing fetch`: only the pricing API is contacted.
pub async fn run_fetch(
    pricing: PricingConfig,
    limits: PricingLimits,
    endpoint: String,
    output_format: &str,
    output_file: Option<PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let fetched = fetch(&pricing, limits, &endpoint, quiet, cancel).await?;
    let output = get_formatter(format).format_records(&fetched.records)?;
    output_result(&output, format, output_file.as_ref())?;

    for failure in &fetched.rejected {
        warn!(key = %failure.key, error = %failure.error, "Rejected pricing record");
    }
    finish_run("Pricing fetch", fetched.rejected.len())
}

/// `pricing import`: fetch, then create each record in the CMS.
#[allow(clippy::too_many_arguments)]
pub async fn run_import(
    config: cms_config::Config,
    pricing: PricingConfig,
    endpoint: String,
    collection: String,
    dry_run: bool,
    output_format: &str,
    output_file: Option<PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let limits = PricingLimits {
        timeout: config.connection.timeout,
        max_retries: config.connection.max_retries,
    };
    let records = fetch(&pricing, limits, &endpoint, quiet, cancel).await?;

    let mut client = build_client_from_config(&config)?;
    info!(%collection, records = records.total(), dry_run, "Importing pricing records");
    let spinner = Spinner::new(!quiet, format!("Importing into {collection}"));
    let report = cancellable!(
        async {
            Ok::<_, anyhow::Error>(
                import_records(&mut client, &collection, &records, dry_run).await,
            )
        },
        cancel
    )?;
    spinner.finish(&format!(
        "{} created, {} failed",
        report.created.len(),
        report.failures.len()
    ));

    let output = get_formatter(format).format_import_report(&report)?;
    output_result(&output, format, output_file.as_ref())?;
    finish_run("Pricing import", report.failures.len())
}
