//! Validation checklist command implementation.
//!
//! Responsibilities:
//! - Load a validation plan (YAML or JSON) and apply command-line overrides.
//! - Run every validation layer against the live collection.
//! - Print the report (table) or the structured result (json).
//!
//! Does NOT handle:
//! - The layer logic itself (see `cms_client::validation`).
//!
//! Invariants:
//! - The report is always printed, even when a layer fails.
//! - A failing report exits with the validation exit code (5).

use anyhow::{Context, Result};
use clap::Args;
use cms_client::{ValidationConfig, ValidationRunner};
use cms_schema::PrimitiveType;
use std::path::PathBuf;
use tracing::info;

use crate::cancellation::CancellationToken;
use crate::error::RunFailed;
use crate::formatters::{OutputFormat, get_formatter, output_result};
use crate::progress::Spinner;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Validation plan file (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Collection to validate (overrides the plan)
    #[arg(long, required_unless_present = "plan")]
    pub collection: Option<String>,

    /// Expected number of active records
    #[arg(long)]
    pub expected_count: Option<u64>,

    /// Record ids to check instead of sampling (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub sample_ids: Vec<String>,

    /// Additional required field paths (comma-separated)
    #[arg(long = "required", value_delimiter = ',', value_name = "PATH")]
    pub required_fields: Vec<String>,

    /// Expected field type as PATH=TYPE (repeatable)
    #[arg(long = "field-type", value_name = "PATH=TYPE", value_parser = parse_field_type)]
    pub field_types: Vec<(String, PrimitiveType)>,

    /// Run the relationship layer
    #[arg(long)]
    pub check_relationships: bool,

    /// Run the admin UI layer (reported as skipped)
    #[arg(long)]
    pub check_ui: bool,
}

fn parse_field_type(raw: &str) -> Result<(String, PrimitiveType), String> {
    let (path, ty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=TYPE, got '{raw}'"))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("empty field path in '{raw}'"));
    }
    Ok((path.to_string(), ty.parse()?))
}

/// Merge the plan file (if any) with command-line overrides.
fn build_validation_config(args: ValidateArgs) -> Result<ValidationConfig> {
    let mut config = match (&args.plan, &args.collection) {
        (Some(path), _) => ValidationConfig::from_file(path)
            .with_context(|| format!("Failed to load validation plan {}", path.display()))?,
        (None, Some(collection)) => ValidationConfig::new(collection.clone()),
        (None, None) => anyhow::bail!("Either --plan or --collection is required"),
    };

    if let Some(collection) = args.collection {
        config.collection = collection;
    }
    if args.expected_count.is_some() {
        config.expected_count = args.expected_count;
    }
    if !args.sample_ids.is_empty() {
        config.sample_ids = args.sample_ids;
    }
    for path in args.required_fields {
        if !config.required_fields.contains(&path) {
            config.required_fields.push(path);
        }
    }
    config.field_types.extend(args.field_types);
    config.check_relationships |= args.check_relationships;
    config.check_ui |= args.check_ui;

    if config.collection.trim().is_empty() {
        anyhow::bail!("Validation plan has an empty collection");
    }
    Ok(config)
}

pub async fn run(
    config: cms_config::Config,
    args: ValidateArgs,
    output_format: &str,
    output_file: Option<PathBuf>,
    quiet: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let plan = build_validation_config(args)?;
    info!(collection = %plan.collection, "Validating collection");

    let mut client = crate::commands::build_client_from_config(&config)?;

    let spinner = Spinner::new(!quiet, format!("Validating {}", plan.collection));
    let report = cancellable!(
        async {
            Ok::<_, anyhow::Error>(ValidationRunner::new(&mut client, &plan).run().await)
        },
        cancel
    )?;
    spinner.finish(if report.passed { "passed" } else { "failed" });

    let output = get_formatter(format).format_validation_report(&report)?;
    output_result(&output, format, output_file.as_ref())?;

    if report.passed {
        Ok(())
    } else {
        Err(RunFailed(format!(
            "Validation of {} failed with {} error(s)",
            report.collection,
            report.errors.len()
        ))
        .into())
    }
}
