//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide JSON and table output for every command result.
//! - Route output to stdout or, with `--output-file`, to a file written atomically.
//!
//! Does NOT handle:
//! - Progress output (see `progress`, always STDERR).
//!
//! Invariants:
//! - Tables are tab-separated; an empty result set renders a human message.
//! - JSON output is always a valid document (`[]` for empty lists).
//! - Missing values render as `N/A` in tables and `null` in JSON.

use anyhow::{Context, Result};
use cms_client::{
    ImportReport, IndexInfo, MigrationReport, PricingRecord, SyncReport, UnitFailure,
    ValidationReport,
};
use cms_schema::GroupedField;
use serde::Serialize;
use std::path::{Path, PathBuf};

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Placeholder for missing values in table output.
pub(crate) const DEFAULT_MISSING_VALUE: &str = "N/A";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: json, table", s),
        }
    }
}

/// Inferred schema for one collection, as shown by `schema inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub collection: String,
    pub files: usize,
    pub fields: Vec<GroupedField>,
}

/// One module written by `schema generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSchema {
    pub collection: String,
    pub path: PathBuf,
    pub fields: usize,
}

/// Result of `schema inspect`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaReport {
    pub collections: Vec<CollectionSchema>,
    /// Review warnings of inferred fields, as `collection.field: warning`.
    pub warnings: Vec<String>,
    /// Content files that could not be parsed.
    pub failures: Vec<UnitFailure>,
}

/// Result of `schema generate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    pub generated: Vec<GeneratedSchema>,
    pub warnings: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

/// Formatter trait for the command results.
pub trait Formatter {
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String>;
    fn format_sync_report(&self, report: &SyncReport) -> Result<String>;
    fn format_migration_report(&self, report: &MigrationReport) -> Result<String>;
    fn format_import_report(&self, report: &ImportReport) -> Result<String>;
    fn format_indexes(&self, collection: &str, indexes: &[IndexInfo]) -> Result<String>;
    fn format_records(&self, records: &[PricingRecord]) -> Result<String>;
    fn format_schemas(&self, report: &SchemaReport) -> Result<String>;
    fn format_generated(&self, report: &GenerateReport) -> Result<String>;
}

/// Get a formatter for the specified format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Write formatted output to `output_file` if given, otherwise to stdout.
pub fn output_result(
    output: &str,
    format: OutputFormat,
    output_file: Option<&PathBuf>,
) -> Result<()> {
    if let Some(path) = output_file {
        write_to_file(output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!(
            "Results written to {} ({:?} format)",
            path.display(),
            format
        );
    } else if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Write output to a file atomically.
///
/// Creates parent directories if needed, writes a temp file in the same
/// directory, then renames it over `path`.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if parent_dir != Path::new(".") {
        fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;
    }

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temp file")?;
    temp_file.flush().context("Failed to flush temp file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_write_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/out.json");

        write_to_file("{}", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
