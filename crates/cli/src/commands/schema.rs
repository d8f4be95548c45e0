//! Schema discovery command implementation.
//!
//! Responsibilities:
//! - Scan a content root and infer one field list per collection.
//! - Print the inferred fields (`inspect`) or write `CollectionConfig` modules (`generate`).
//!
//! Does NOT handle:
//! - Any CMS connection; these commands only read and write local files.
//!
//! Invariants:
//! - Unparseable files never abort the run; they are listed after the output
//!   and the command exits 5.
//! - Collections are processed in first-seen (sorted path) order.

use anyhow::{Context, Result};
use clap::Subcommand;
use cms_config::constants::{DEFAULT_MAX_VERSIONS, DEFAULT_SOFT_DELETE_FIELD};
use cms_client::UnitFailure;
use cms_schema::{
    EmitOptions, FileRecord, GroupedField, aggregate_by_collection, collection_of, infer_fields,
    organize_fields, scan_directory, write_collection,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::finish_run;
use crate::formatters::{
    CollectionSchema, GenerateReport, GeneratedSchema, OutputFormat, SchemaReport, get_formatter,
    output_result,
};

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Show the fields inferred from content frontmatter
    Inspect {
        /// Content root; first-level directories name the collections
        #[arg(long, value_name = "DIR")]
        root: PathBuf,
        /// Only inspect this collection
        #[arg(long)]
        collection: Option<String>,
    },
    /// Write one CollectionConfig TypeScript module per collection
    Generate {
        /// Content root; first-level directories name the collections
        #[arg(long, value_name = "DIR")]
        root: PathBuf,
        /// Directory to write the modules into
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Only generate this collection
        #[arg(long)]
        collection: Option<String>,
        /// Maximum stored versions per document
        #[arg(long, default_value_t = DEFAULT_MAX_VERSIONS)]
        max_versions: u32,
    },
}

pub fn run(command: SchemaCommand, output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let formatter = get_formatter(format);

    match command {
        SchemaCommand::Inspect { root, collection } => {
            let report = discover(&root, collection.as_deref())?;
            let output = formatter.format_schemas(&report)?;
            output_result(&output, format, output_file.as_ref())?;
            finish_run("Schema scan", report.failures.len())
        }
        SchemaCommand::Generate {
            root,
            out,
            collection,
            max_versions,
        } => {
            let options = EmitOptions {
                max_versions,
                soft_delete_field: DEFAULT_SOFT_DELETE_FIELD.to_string(),
            };
            let report = generate(&root, &out, collection.as_deref(), &options)?;
            let output = formatter.format_generated(&report)?;
            output_result(&output, format, output_file.as_ref())?;
            finish_run("Schema scan", report.failures.len())
        }
    }
}

/// `collection.field: warning` for every inferred field flagged for review.
fn review_warnings(schema: &CollectionSchema) -> Vec<String> {
    let mut warnings = Vec::new();
    for entry in &schema.fields {
        let (prefix, fields) = match entry {
            GroupedField::Single(field) => (None, std::slice::from_ref(field)),
            GroupedField::Group { name, fields } => (Some(name.as_str()), fields.as_slice()),
        };
        for field in fields {
            if let Some(review) = &field.review {
                let path = match prefix {
                    Some(group) => format!("{group}.{}", field.name),
                    None => field.name.clone(),
                };
                warnings.push(format!("{}.{path}: {review}", schema.collection));
            }
        }
    }
    warnings
}

/// Scan `root` and infer the grouped field list of each collection.
fn discover(root: &Path, only: Option<&str>) -> Result<SchemaReport> {
    info!(root = %root.display(), "Scanning content");

    let outcome = scan_directory(root)
        .with_context(|| format!("Failed to scan content root {}", root.display()))?;

    let failures: Vec<UnitFailure> = outcome
        .errors
        .iter()
        .filter(|error| only.is_none_or(|c| collection_of(root, &error.path) == c))
        .map(|error| {
            warn!(path = %error.path.display(), reason = %error.reason, "Unparseable content file");
            UnitFailure::new(error.path.display().to_string(), &error.reason)
        })
        .collect();

    let records: Vec<FileRecord> = outcome
        .records
        .into_iter()
        .filter(|record| only.is_none_or(|c| record.collection == c))
        .collect();

    let collections = aggregate_by_collection(&records)
        .into_iter()
        .map(|(collection, aggregation)| CollectionSchema {
            files: aggregation.file_count,
            fields: organize_fields(infer_fields(&aggregation)),
            collection,
        })
        .collect::<Vec<_>>();
    let warnings = collections.iter().flat_map(review_warnings).collect();

    info!(
        files = records.len(),
        collections = collections.len(),
        failed = failures.len(),
        "Inferred collection schemas"
    );
    Ok(SchemaReport {
        collections,
        warnings,
        failures,
    })
}

fn generate(
    root: &Path,
    out_dir: &Path,
    only: Option<&str>,
    options: &EmitOptions,
) -> Result<GenerateReport> {
    let discovered = discover(root, only)?;
    let mut generated = Vec::with_capacity(discovered.collections.len());

    for schema in discovered.collections {
        let path = write_collection(out_dir, &schema.collection, &schema.fields, options)?;
        generated.push(GeneratedSchema {
            fields: schema.fields.len(),
            collection: schema.collection,
            path,
        });
    }

    Ok(GenerateReport {
        generated,
        warnings: discovered.warnings,
        failures: discovered.failures,
    })
}
