//! Testing utilities for CMS client tests.
//!
//! This module provides fixture loading and an in-memory [`DocumentStore`]
//! and [`IndexManager`] so runners can be exercised without a server.
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use cms_client::testing::{InMemoryStore, load_fixture};
//!
//! let mut store = InMemoryStore::new();
//! store.insert_json("posts", load_fixture("documents/post.json"));
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use cms_schema::{FieldMap, FieldValue};

use crate::endpoints::{Filter, FindQuery};
use crate::error::{ClientError, Result};
use crate::models::{Document, DocumentPage, IndexInfo, IndexSpec};
use crate::store::{DocumentStore, IndexManager};

/// Load a JSON fixture file from the fixtures directory.
///
/// # Arguments
/// * `fixture_path` - Relative path within the fixtures directory (e.g., "documents/post.json")
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A write performed against an [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreWrite {
    Create {
        collection: String,
        locale: Option<String>,
        data: FieldMap,
    },
    Update {
        collection: String,
        id: String,
        locale: Option<String>,
    },
    Delete {
        collection: String,
        id: String,
    },
    CreateIndex {
        collection: String,
        name: String,
    },
}

/// Collection store held in memory, with filter evaluation matching the
/// REST API's `where` semantics and optional failure injection.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: BTreeMap<String, Vec<Document>>,
    indexes: BTreeMap<String, Vec<IndexInfo>>,
    failing_collections: HashSet<String>,
    rejected_indexes: BTreeMap<String, String>,
    next_id: u64,
    writes: Vec<StoreWrite>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document as-is.
    pub fn insert(&mut self, collection: &str, doc: FieldMap) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(Document(doc));
    }

    /// Insert a JSON object document.
    ///
    /// # Panics
    /// If `value` is not a JSON object.
    pub fn insert_json(&mut self, collection: &str, value: serde_json::Value) {
        match FieldValue::from(value) {
            FieldValue::Map(map) => self.insert(collection, map),
            other => panic!("expected a JSON object document, got {other}"),
        }
    }

    /// Register an index as already existing.
    pub fn add_index(&mut self, collection: &str, name: &str) {
        self.indexes
            .entry(collection.to_string())
            .or_default()
            .push(IndexInfo {
                name: name.to_string(),
                key: serde_json::Value::Null,
                unique: false,
            });
    }

    /// Make every call touching `collection` fail with a 500.
    pub fn fail_collection(&mut self, collection: &str) {
        self.failing_collections.insert(collection.to_string());
    }

    /// Make creating index `name` fail with a 400 carrying `message`.
    pub fn reject_index(&mut self, name: &str, message: &str) {
        self.rejected_indexes
            .insert(name.to_string(), message.to_string());
    }

    pub fn documents(&self, collection: &str) -> &[Document] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn index_names(&self, collection: &str) -> Vec<String> {
        self.indexes
            .get(collection)
            .map(|list| list.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    fn check(&self, collection: &str) -> Result<()> {
        if self.failing_collections.contains(collection) {
            return Err(ClientError::ApiError {
                status: 500,
                url: format!("memory://api/{collection}"),
                message: "Something went wrong.".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(collection: &str, id: &str) -> ClientError {
        ClientError::ApiError {
            status: 404,
            url: format!("memory://api/{collection}/{id}"),
            message: "The requested resource was not found.".to_string(),
        }
    }

    fn position(&self, collection: &str, id: &str) -> Option<usize> {
        self.collections
            .get(collection)?
            .iter()
            .position(|doc| doc.id().as_deref() == Some(id))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&mut self, collection: &str, query: &FindQuery) -> Result<DocumentPage> {
        self.check(collection)?;
        let matching: Vec<Document> = self
            .documents(collection)
            .iter()
            .filter(|doc| query.filter.matches(doc.fields()))
            .cloned()
            .collect();

        let total_docs = matching.len() as u64;
        let limit = query.limit.unwrap_or(10).max(1);
        let page = query.page.unwrap_or(1).max(1);
        let docs = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        let total_pages = total_docs.div_ceil(limit);

        Ok(DocumentPage {
            docs,
            total_docs,
            limit: Some(limit),
            page: Some(page),
            total_pages: Some(total_pages),
            has_next_page: page < total_pages,
        })
    }

    async fn find_by_id(&mut self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.check(collection)?;
        Ok(self
            .position(collection, id)
            .map(|i| self.documents(collection)[i].clone()))
    }

    async fn count(&mut self, collection: &str, filter: &Filter) -> Result<u64> {
        self.check(collection)?;
        Ok(self
            .documents(collection)
            .iter()
            .filter(|doc| filter.matches(doc.fields()))
            .count() as u64)
    }

    async fn create(
        &mut self,
        collection: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        self.check(collection)?;
        self.next_id += 1;

        let mut doc = data.clone();
        doc.entry("id".to_string())
            .or_insert_with(|| FieldValue::String(format!("doc-{}", self.next_id)));
        doc.entry("deletedAt".to_string())
            .or_insert(FieldValue::Null);

        self.writes.push(StoreWrite::Create {
            collection: collection.to_string(),
            locale: locale.map(str::to_string),
            data: data.clone(),
        });
        self.insert(collection, doc.clone());
        Ok(Document(doc))
    }

    async fn update(
        &mut self,
        collection: &str,
        id: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        self.check(collection)?;
        let index = self
            .position(collection, id)
            .ok_or_else(|| Self::not_found(collection, id))?;

        self.writes.push(StoreWrite::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            locale: locale.map(str::to_string),
        });

        let docs = self.collections.entry(collection.to_string()).or_default();
        let doc = &mut docs[index].0;
        for (key, value) in data {
            doc.insert(key.clone(), value.clone());
        }
        Ok(docs[index].clone())
    }

    async fn delete(&mut self, collection: &str, id: &str) -> Result<Document> {
        self.check(collection)?;
        let index = self
            .position(collection, id)
            .ok_or_else(|| Self::not_found(collection, id))?;

        self.writes.push(StoreWrite::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        Ok(self
            .collections
            .entry(collection.to_string())
            .or_default()
            .remove(index))
    }
}

#[async_trait]
impl IndexManager for InMemoryStore {
    async fn list_indexes(&mut self, collection: &str) -> Result<Vec<IndexInfo>> {
        self.check(collection)?;
        Ok(self.indexes.get(collection).cloned().unwrap_or_default())
    }

    async fn create_index(&mut self, collection: &str, spec: &IndexSpec) -> Result<()> {
        self.check(collection)?;
        if let Some(message) = self.rejected_indexes.get(&spec.name) {
            return Err(ClientError::ApiError {
                status: 400,
                url: format!("memory://api/{collection}/indexes"),
                message: message.clone(),
            });
        }

        self.writes.push(StoreWrite::CreateIndex {
            collection: collection.to_string(),
            name: spec.name.clone(),
        });
        self.add_index(collection, &spec.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_applies_filter_and_limit() {
        let mut store = InMemoryStore::new();
        store.insert_json("posts", json!({"id": "1", "slug": "a", "deletedAt": null}));
        store.insert_json("posts", json!({"id": "2", "slug": "b"}));
        store.insert_json("posts", json!({"id": "3", "slug": "c", "deletedAt": "2024-01-01"}));

        let active = Filter::new().is_null("deletedAt");
        assert_eq!(store.count("posts", &active).await.unwrap(), 2);

        let page = store
            .find("posts", &FindQuery::new(active).limit(1))
            .await
            .unwrap();
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.total_docs, 2);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let mut store = InMemoryStore::new();
        let mut data = FieldMap::new();
        data.insert("slug".to_string(), "hello".into());

        let doc = store.create("posts", &data, Some("es")).await.unwrap();
        let id = doc.id().unwrap();
        assert_eq!(doc.get("deletedAt"), Some(&FieldValue::Null));

        data.insert("title".to_string(), "Hola".into());
        let updated = store.update("posts", &id, &data, None).await.unwrap();
        assert_eq!(updated.get("title"), Some(&FieldValue::from("Hola")));

        store.delete("posts", &id).await.unwrap();
        assert!(store.find_by_id("posts", &id).await.unwrap().is_none());
        assert_eq!(store.writes().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mut store = InMemoryStore::new();
        store.fail_collection("posts");
        let err = store.count("posts", &Filter::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 500, .. }));
    }
}
