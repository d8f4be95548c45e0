//! Layered validation of migrated data.
//!
//! Responsibilities:
//! - Load a validation plan (YAML or JSON) describing one collection
//! - Run each check layer against a [`DocumentStore`] in a fixed order
//! - Collect per-layer results into a [`ValidationReport`]
//!
//! Does NOT handle:
//! - Admin UI checks (the UI layer is a placeholder that reports itself skipped)
//! - Output formatting beyond the plain-text report (see the CLI formatters)
//!
//! Invariants:
//! - Layers are independent: a failing layer never stops later layers
//! - A store error inside a layer becomes an error of that layer
//! - Only active records (soft-delete marker null) are sampled

mod layers;
mod report;

use std::collections::BTreeMap;
use std::path::Path;

use cms_config::constants::{
    DEFAULT_FIELD_TYPE_SAMPLE_SIZE, DEFAULT_RELATIONSHIP_SAMPLE_SIZE,
    DEFAULT_REQUIRED_SAMPLE_SIZE, DEFAULT_SOFT_DELETE_FIELD,
};
use cms_schema::PrimitiveType;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClientError, Result};
use crate::store::DocumentStore;

pub use report::{Layer, ValidationReport, ValidationResult};

fn default_required_sample_size() -> usize {
    DEFAULT_REQUIRED_SAMPLE_SIZE
}

fn default_relationship_sample_size() -> usize {
    DEFAULT_RELATIONSHIP_SAMPLE_SIZE
}

fn default_field_type_sample_size() -> usize {
    DEFAULT_FIELD_TYPE_SAMPLE_SIZE
}

fn default_soft_delete_field() -> String {
    DEFAULT_SOFT_DELETE_FIELD.to_string()
}

/// A reference from one collection to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRule {
    /// Dot path of the reference field, e.g. `providerMetadata`.
    pub field: String,
    /// Collection the referenced ids live in.
    pub target: String,
    #[serde(default)]
    pub has_many: bool,
}

/// What to validate for one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub collection: String,
    #[serde(default)]
    pub expected_count: Option<u64>,
    /// Records to check instead of sampling.
    #[serde(default)]
    pub sample_ids: Vec<String>,
    #[serde(default)]
    pub check_relationships: bool,
    #[serde(default)]
    pub check_ui: bool,
    /// Dot paths that must hold a non-empty value.
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRule>,
    /// Expected runtime type per dot path.
    #[serde(default)]
    pub field_types: BTreeMap<String, PrimitiveType>,
    #[serde(default = "default_required_sample_size")]
    pub required_sample_size: usize,
    #[serde(default = "default_relationship_sample_size")]
    pub relationship_sample_size: usize,
    #[serde(default = "default_field_type_sample_size")]
    pub field_type_sample_size: usize,
    #[serde(default = "default_soft_delete_field")]
    pub soft_delete_field: String,
}

impl ValidationConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            expected_count: None,
            sample_ids: Vec::new(),
            check_relationships: false,
            check_ui: false,
            required_fields: Vec::new(),
            relationships: Vec::new(),
            field_types: BTreeMap::new(),
            required_sample_size: DEFAULT_REQUIRED_SAMPLE_SIZE,
            relationship_sample_size: DEFAULT_RELATIONSHIP_SAMPLE_SIZE,
            field_type_sample_size: DEFAULT_FIELD_TYPE_SAMPLE_SIZE,
            soft_delete_field: DEFAULT_SOFT_DELETE_FIELD.to_string(),
        }
    }

    /// Parse a plan; JSON is accepted since it is valid YAML.
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid validation plan: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ClientError::InvalidRequest(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&source)
    }
}

/// Runs the validation layers for one collection.
pub struct ValidationRunner<'a, S: DocumentStore + ?Sized> {
    store: &'a mut S,
    config: &'a ValidationConfig,
}

impl<'a, S: DocumentStore + ?Sized> ValidationRunner<'a, S> {
    pub fn new(store: &'a mut S, config: &'a ValidationConfig) -> Self {
        Self { store, config }
    }

    /// Run every enabled layer in order and collect the report.
    pub async fn run(&mut self) -> ValidationReport {
        let config = self.config;
        info!(collection = %config.collection, "Running validation");

        let mut results = vec![
            layers::count(self.store, config).await,
            layers::required_fields(self.store, config).await,
            layers::soft_delete(self.store, config).await,
        ];
        if config.check_relationships {
            results.push(layers::relationships(self.store, config).await);
        }
        results.push(layers::field_types(self.store, config).await);
        if config.check_ui {
            results.push(layers::ui());
        }

        for result in &results {
            info!(
                layer = result.layer.as_str(),
                passed = result.passed,
                errors = result.errors.len(),
                "Validation layer finished"
            );
        }

        ValidationReport::new(&config.collection, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ValidationConfig::from_yaml("collection: posts\n").unwrap();
        assert_eq!(config.required_sample_size, 10);
        assert_eq!(config.relationship_sample_size, 100);
        assert_eq!(config.field_type_sample_size, 10);
        assert_eq!(config.soft_delete_field, "deletedAt");
        assert!(!config.check_relationships);
        assert_eq!(config, ValidationConfig::new("posts"));
    }

    #[test]
    fn test_config_full_plan() {
        let config = ValidationConfig::from_yaml(
            r#"
collection: electricity-providers
expected_count: 157
check_relationships: true
required_fields: [title, slug, seo.title]
relationships:
  - field: providerMetadata
    target: provider-metadatas
field_types:
  wpPostId: number
  featured: bool
"#,
        )
        .unwrap();

        assert_eq!(config.expected_count, Some(157));
        assert_eq!(config.required_fields.len(), 3);
        assert!(!config.relationships[0].has_many);
        assert_eq!(config.field_types["wpPostId"], PrimitiveType::Number);
        assert_eq!(config.field_types["featured"], PrimitiveType::Boolean);
    }

    #[test]
    fn test_config_accepts_json() {
        let config =
            ValidationConfig::from_yaml(r#"{"collection": "posts", "sample_ids": ["a", "b"]}"#)
                .unwrap();
        assert_eq!(config.sample_ids, vec!["a", "b"]);
    }
}
