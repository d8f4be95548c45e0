//! JSON formatter implementation.
//!
//! Every result is pretty-printed through its `Serialize` impl.

use anyhow::Result;
use cms_client::{
    ImportReport, IndexInfo, MigrationReport, PricingRecord, SyncReport, ValidationReport,
};

use crate::formatters::{Formatter, GenerateReport, SchemaReport};

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_validation_report(&self, report: &ValidationReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_sync_report(&self, report: &SyncReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_migration_report(&self, report: &MigrationReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_import_report(&self, report: &ImportReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_indexes(&self, _collection: &str, indexes: &[IndexInfo]) -> Result<String> {
        Ok(serde_json::to_string_pretty(indexes)?)
    }

    fn format_records(&self, records: &[PricingRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    fn format_schemas(&self, report: &SchemaReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_generated(&self, report: &GenerateReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_client::{Layer, ValidationResult};

    #[test]
    fn test_validation_report_json_shape() {
        let report = ValidationReport::new(
            "posts",
            vec![ValidationResult::from_errors(
                Layer::Count,
                "expected 2, found 1",
                vec!["active record count mismatch: expected 2, found 1".to_string()],
            )],
        );

        let output = JsonFormatter.format_validation_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["collection"], "posts");
        assert_eq!(value["passed"], false);
        assert_eq!(value["results"][0]["layer"], "count");
        assert_eq!(
            value["errors"][0],
            "[count] active record count mismatch: expected 2, found 1"
        );
    }

    #[test]
    fn test_empty_lists_are_valid_json() {
        assert_eq!(JsonFormatter.format_indexes("posts", &[]).unwrap(), "[]");
        assert_eq!(JsonFormatter.format_records(&[]).unwrap(), "[]");
    }
}
