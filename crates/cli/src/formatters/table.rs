//! Table formatter implementation.
//!
//! Responsibilities:
//! - Format command results as tab-separated tables.
//! - Summarize batch runs with per-unit failures listed last.
//!
//! Does NOT handle:
//! - Machine-readable output (see `json`).

use anyhow::Result;
use cms_client::{
    ImportReport, IndexInfo, MigrationReport, PricingRecord, SyncReport, UnitFailure,
    ValidationReport,
};
use cms_schema::{FieldMap, GroupedField, InferredField};
use std::fmt::Write as _;

use crate::formatters::{DEFAULT_MISSING_VALUE, Formatter, GenerateReport, SchemaReport};

/// Table formatter.
pub struct TableFormatter;

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn push_entries(out: &mut String, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title} ({}):", entries.len());
    for entry in entries {
        let _ = writeln!(out, "  {entry}");
    }
}

fn push_failures(out: &mut String, failures: &[UnitFailure]) {
    if failures.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nFailures ({}):", failures.len());
    for failure in failures {
        let _ = writeln!(out, "  {}\t{}", failure.key, failure.error);
    }
}

fn push_field_row(out: &mut String, path: &str, field: &InferredField) {
    let _ = writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}",
        path,
        field.kind.payload_type(),
        yes_no(field.required),
        yes_no(field.unique),
        yes_no(field.indexed),
        field.review.as_deref().unwrap_or("")
    );
}

/// Compact, single-line rendering of a record field.
fn cell(record: &FieldMap, key: &str) -> String {
    match record.get(key) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_MISSING_VALUE.to_string(),
    }
}

impl Formatter for TableFormatter {
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        Ok(report.render())
    }

    fn format_sync_report(&self, report: &SyncReport) -> Result<String> {
        let mut out = format!(
            "Index sync: {} created, {} existing, {} planned, {} failed\n",
            report.created.len(),
            report.existing.len(),
            report.planned.len(),
            report.failed.len()
        );
        push_entries(&mut out, "Created", &report.created);
        push_entries(&mut out, "Would create", &report.planned);
        push_failures(&mut out, &report.failed);
        Ok(out)
    }

    fn format_migration_report(&self, report: &MigrationReport) -> Result<String> {
        let mut out = format!(
            "Migration to {}: {} created, {} updated, {} planned, {} failed\n",
            report.collection,
            report.created.len(),
            report.updated.len(),
            report.planned.len(),
            report.failures.len()
        );
        push_entries(&mut out, "Would write", &report.planned);
        push_failures(&mut out, &report.failures);
        Ok(out)
    }

    fn format_import_report(&self, report: &ImportReport) -> Result<String> {
        let mut out = format!(
            "Import to {}: {} records, {} created, {} planned, {} failed\n",
            report.collection,
            report.total,
            report.created.len(),
            report.planned.len(),
            report.failures.len()
        );
        push_entries(&mut out, "Would create", &report.planned);
        push_failures(&mut out, &report.failures);
        Ok(out)
    }

    fn format_indexes(&self, collection: &str, indexes: &[IndexInfo]) -> Result<String> {
        if indexes.is_empty() {
            return Ok(format!("No indexes found on {collection}."));
        }

        let mut out = String::from("Name\tKey\tUnique\n");
        for index in indexes {
            let key = if index.key.is_null() {
                DEFAULT_MISSING_VALUE.to_string()
            } else {
                index.key.to_string()
            };
            let _ = writeln!(out, "{}\t{}\t{}", index.name, key, yes_no(index.unique));
        }
        Ok(out)
    }

    fn format_records(&self, records: &[PricingRecord]) -> Result<String> {
        if records.is_empty() {
            return Ok("No records found.".to_string());
        }

        let mut out = String::from("Key\tName\tFields\n");
        for record in records {
            let fields = record.fields.keys().cloned().collect::<Vec<_>>().join(",");
            let _ = writeln!(
                out,
                "{}\t{}\t{}",
                record.key(),
                cell(&record.fields, "name"),
                fields
            );
        }
        Ok(out)
    }

    fn format_schemas(&self, report: &SchemaReport) -> Result<String> {
        let mut out = String::new();
        if report.collections.is_empty() {
            out.push_str("No content files found.\n");
        }

        for (i, schema) in report.collections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "{} ({} files)", schema.collection, schema.files);
            out.push_str("Field\tType\tRequired\tUnique\tIndexed\tReview\n");
            for entry in &schema.fields {
                match entry {
                    GroupedField::Single(field) => push_field_row(&mut out, &field.name, field),
                    GroupedField::Group { name, fields } => {
                        for field in fields {
                            push_field_row(&mut out, &format!("{name}.{}", field.name), field);
                        }
                    }
                }
            }
        }
        push_entries(&mut out, "Warnings", &report.warnings);
        push_failures(&mut out, &report.failures);
        Ok(out)
    }

    fn format_generated(&self, report: &GenerateReport) -> Result<String> {
        let mut out = String::new();
        if report.generated.is_empty() {
            out.push_str("No collections generated.\n");
        } else {
            out.push_str("Collection\tFields\tPath\n");
        }

        for schema in &report.generated {
            let _ = writeln!(
                out,
                "{}\t{}\t{}",
                schema.collection,
                schema.fields,
                schema.path.display()
            );
        }
        push_entries(&mut out, "Warnings", &report.warnings);
        push_failures(&mut out, &report.failures);
        Ok(out)
    }
}
