//! Store abstractions used by the migration, validation and index sync runners.
//!
//! [`PayloadClient`] implements both traits against the live REST API; the
//! in-memory store in [`crate::testing`] implements them for tests.

use async_trait::async_trait;
use cms_schema::FieldMap;

use crate::client::PayloadClient;
use crate::endpoints::{Filter, FindQuery};
use crate::error::Result;
use crate::models::{Document, DocumentPage, IndexInfo, IndexSpec};

/// Document CRUD over named collections.
#[async_trait]
pub trait DocumentStore: Send {
    async fn find(&mut self, collection: &str, query: &FindQuery) -> Result<DocumentPage>;

    /// Fetch by id; `Ok(None)` when the document does not exist.
    async fn find_by_id(&mut self, collection: &str, id: &str) -> Result<Option<Document>>;

    async fn count(&mut self, collection: &str, filter: &Filter) -> Result<u64>;

    async fn create(
        &mut self,
        collection: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document>;

    async fn update(
        &mut self,
        collection: &str,
        id: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document>;

    async fn delete(&mut self, collection: &str, id: &str) -> Result<Document>;
}

/// Index listing and creation per collection.
#[async_trait]
pub trait IndexManager: Send {
    async fn list_indexes(&mut self, collection: &str) -> Result<Vec<IndexInfo>>;

    async fn create_index(&mut self, collection: &str, spec: &IndexSpec) -> Result<()>;
}

#[async_trait]
impl DocumentStore for PayloadClient {
    async fn find(&mut self, collection: &str, query: &FindQuery) -> Result<DocumentPage> {
        self.find_documents(collection, query).await
    }

    async fn find_by_id(&mut self, collection: &str, id: &str) -> Result<Option<Document>> {
        // Relationship checks only need the id to resolve.
        self.find_document_by_id(collection, id, Some(0)).await
    }

    async fn count(&mut self, collection: &str, filter: &Filter) -> Result<u64> {
        self.count_documents(collection, filter).await
    }

    async fn create(
        &mut self,
        collection: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        self.create_document(collection, data, locale).await
    }

    async fn update(
        &mut self,
        collection: &str,
        id: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        self.update_document(collection, id, data, locale).await
    }

    async fn delete(&mut self, collection: &str, id: &str) -> Result<Document> {
        self.delete_document(collection, id).await
    }
}

#[async_trait]
impl IndexManager for PayloadClient {
    async fn list_indexes(&mut self, collection: &str) -> Result<Vec<IndexInfo>> {
        PayloadClient::list_indexes(self, collection).await
    }

    async fn create_index(&mut self, collection: &str, spec: &IndexSpec) -> Result<()> {
        PayloadClient::create_index(self, collection, spec).await
    }
}
