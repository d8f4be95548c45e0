//! Validation results and the plain-text report.

use std::fmt::Write as _;

use serde::Serialize;

const BANNER_WIDTH: usize = 60;

/// One validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Count,
    RequiredFields,
    SoftDelete,
    Relationships,
    FieldTypes,
    Ui,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::RequiredFields => "required_fields",
            Self::SoftDelete => "soft_delete",
            Self::Relationships => "relationships",
            Self::FieldTypes => "field_types",
            Self::Ui => "ui",
        }
    }
}

/// Outcome of one layer.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub layer: Layer,
    pub passed: bool,
    pub message: String,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// A result that passes iff `errors` is empty.
    pub fn from_errors(layer: Layer, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            layer,
            passed: errors.is_empty(),
            message: message.into(),
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn failed(layer: Layer, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            layer,
            passed: false,
            message: error.clone(),
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// All layer results for one collection.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub collection: String,
    pub passed: bool,
    pub results: Vec<ValidationResult>,
    /// Every layer error, prefixed with `[layer]`.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new(collection: &str, results: Vec<ValidationResult>) -> Self {
        let passed = results.iter().all(|r| r.passed);
        let prefixed = |r: &ValidationResult, items: &[String]| {
            items
                .iter()
                .map(|item| format!("[{}] {}", r.layer.as_str(), item))
                .collect::<Vec<_>>()
        };
        let errors = results
            .iter()
            .flat_map(|r| prefixed(r, &r.errors))
            .collect();
        let warnings = results
            .iter()
            .flat_map(|r| prefixed(r, &r.warnings))
            .collect();

        Self {
            collection: collection.to_string(),
            passed,
            results,
            errors,
            warnings,
        }
    }

    pub fn result(&self, layer: Layer) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.layer == layer)
    }

    /// Render the human-readable report.
    pub fn render(&self) -> String {
        let rule = "=".repeat(BANNER_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "VALIDATION REPORT: {}", self.collection);
        let _ = writeln!(out, "{rule}");
        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "[{status}] {:<16} {}",
                result.layer.as_str(),
                result.message
            );
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Errors ({}):", self.errors.len());
            for error in &self.errors {
                let _ = writeln!(out, "  - {error}");
            }
        }
        if !self.warnings.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Warnings ({}):", self.warnings.len());
            for warning in &self.warnings {
                let _ = writeln!(out, "  - {warning}");
            }
        }

        let _ = writeln!(out, "{rule}");
        let overall = if self.passed { "PASSED" } else { "FAILED" };
        let _ = writeln!(out, "OVERALL: {overall}");
        out
    }
}
