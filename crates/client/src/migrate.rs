//! Content migration: frontmatter files to CMS documents.
//!
//! Each file of the source collection becomes one document. Field names are
//! camelCased and recognized prefixes are nested into groups the same way the
//! generated schema groups them, so `seo_title` lands at `seo.title`.

use std::collections::HashSet;
use std::path::Path;

use cms_config::constants::DEFAULT_SOFT_DELETE_FIELD;
use cms_schema::{
    FieldMap, FieldValue, FileRecord, collection_of, scan_directory, split_group, to_camel_case,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::endpoints::{Filter, FindQuery};
use crate::error::{ClientError, Result, UnitFailure};
use crate::store::DocumentStore;

/// Options for a migration run.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Target collection slug.
    pub collection: String,
    /// Content collection (directory) to read; defaults to the target slug.
    pub source: Option<String>,
    pub soft_delete_field: String,
    pub dry_run: bool,
}

impl MigrationOptions {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            source: None,
            soft_delete_field: DEFAULT_SOFT_DELETE_FIELD.to_string(),
            dry_run: false,
        }
    }

    fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.collection)
    }
}

/// What a migration run did. Entries are file paths.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub collection: String,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    /// Files a dry run would write.
    pub planned: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.created.len() + self.updated.len() + self.planned.len() + self.failures.len()
    }
}

/// Build the document body for one content file.
///
/// A prefixed field is nested under its group unless a scalar top-level field
/// uses the group name, in which case it stays flat. A top-level map under the
/// group name is merged with the prefixed fields, which win on conflict. The
/// result does not depend on frontmatter key order.
pub fn build_document(record: &FileRecord) -> FieldMap {
    let scalar_names: HashSet<String> = record
        .fields
        .iter()
        .filter(|(name, value)| split_group(name).is_none() && value.as_map().is_none())
        .map(|(name, _)| to_camel_case(name))
        .collect();

    let mut doc = FieldMap::new();
    for (name, value) in &record.fields {
        match split_group(name) {
            Some((group, inner)) if !scalar_names.contains(group) => {
                let entry = doc
                    .entry(group.to_string())
                    .or_insert_with(|| FieldValue::Map(FieldMap::new()));
                if let FieldValue::Map(fields) = entry {
                    fields.insert(inner, value.clone());
                }
            }
            _ => {
                let key = to_camel_case(name);
                if let (Some(FieldValue::Map(existing)), FieldValue::Map(nested)) =
                    (doc.get_mut(&key), value)
                {
                    for (inner, nested_value) in nested {
                        existing
                            .entry(inner.clone())
                            .or_insert_with(|| nested_value.clone());
                    }
                } else {
                    doc.insert(key, value.clone());
                }
            }
        }
    }

    doc
}

/// Scan `root` and migrate every file of the source collection.
///
/// Files of the source collection that fail to parse are reported as
/// failures alongside write errors.
pub async fn migrate_content<S>(
    store: &mut S,
    root: &Path,
    options: &MigrationOptions,
) -> Result<MigrationReport>
where
    S: DocumentStore + ?Sized,
{
    let outcome = scan_directory(root)
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to scan content: {e}")))?;

    let mut report = migrate_records(store, &outcome.records, options).await;
    for error in outcome.errors {
        if collection_of(root, &error.path) != options.source() {
            continue;
        }
        report
            .failures
            .push(UnitFailure::new(error.path.display().to_string(), error.reason));
    }
    Ok(report)
}

/// Upsert each record of the source collection by slug.
pub async fn migrate_records<S>(
    store: &mut S,
    records: &[FileRecord],
    options: &MigrationOptions,
) -> MigrationReport
where
    S: DocumentStore + ?Sized,
{
    let mut report = MigrationReport {
        collection: options.collection.clone(),
        ..MigrationReport::default()
    };

    let selected = records.iter().filter(|r| r.collection == options.source());
    for record in selected {
        let key = record.path.display().to_string();
        let data = build_document(record);

        let Some(slug) = data.get("slug").and_then(FieldValue::as_str).filter(|s| !s.is_empty())
        else {
            report
                .failures
                .push(UnitFailure::new(key, "no slug to upsert by"));
            continue;
        };

        if options.dry_run {
            debug!(path = %key, slug, "Would migrate");
            report.planned.push(key);
            continue;
        }

        match upsert(store, options, record.locale.as_deref(), slug, &data).await {
            Ok(Upserted::Created) => report.created.push(key),
            Ok(Upserted::Updated) => report.updated.push(key),
            Err(e) => {
                warn!(path = %key, slug, error = %e, "Failed to migrate file");
                report.failures.push(UnitFailure::new(key, e));
            }
        }
    }

    info!(
        collection = %options.collection,
        created = report.created.len(),
        updated = report.updated.len(),
        failed = report.failures.len(),
        dry_run = options.dry_run,
        "Content migration finished"
    );
    report
}

enum Upserted {
    Created,
    Updated,
}

async fn upsert<S>(
    store: &mut S,
    options: &MigrationOptions,
    locale: Option<&str>,
    slug: &str,
    data: &FieldMap,
) -> Result<Upserted>
where
    S: DocumentStore + ?Sized,
{
    let query = FindQuery::new(
        Filter::new()
            .equals("slug", slug)
            .is_null(&options.soft_delete_field),
    )
    .limit(1)
    .depth(0)
    .locale(locale);

    let page = store.find(&options.collection, &query).await?;
    match page.docs.first().and_then(|doc| doc.id()) {
        Some(id) => {
            store.update(&options.collection, &id, data, locale).await?;
            Ok(Upserted::Updated)
        }
        None => {
            store.create(&options.collection, data, locale).await?;
            Ok(Upserted::Created)
        }
    }
}
