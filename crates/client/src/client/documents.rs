//! Collection document API methods for [`PayloadClient`].
//!
//! # What this module does NOT handle:
//! - Low-level HTTP calls (in [`crate::endpoints::documents`](crate::endpoints))
//! - Filter construction (in [`crate::endpoints::Filter`])

use cms_schema::FieldMap;

use crate::client::PayloadClient;
use crate::endpoints::{self, Filter, FindQuery};
use crate::error::Result;
use crate::models::{Document, DocumentPage};

impl PayloadClient {
    /// Query a collection.
    pub async fn find_documents(
        &mut self,
        collection: &str,
        query: &FindQuery,
    ) -> Result<DocumentPage> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::find_documents(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                query,
                self.max_retries,
            )
            .await
        )
    }

    /// Fetch one document by id, `None` if it does not exist.
    pub async fn find_document_by_id(
        &mut self,
        collection: &str,
        id: &str,
        depth: Option<u8>,
    ) -> Result<Option<Document>> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::find_document_by_id(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                id,
                depth,
                self.max_retries,
            )
            .await
        )
    }

    /// Count documents matching `filter`.
    pub async fn count_documents(&mut self, collection: &str, filter: &Filter) -> Result<u64> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::count_documents(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                filter,
                self.max_retries,
            )
            .await
        )
    }

    pub async fn create_document(
        &mut self,
        collection: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::create_document(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                data,
                locale,
                self.max_retries,
            )
            .await
        )
    }

    pub async fn update_document(
        &mut self,
        collection: &str,
        id: &str,
        data: &FieldMap,
        locale: Option<&str>,
    ) -> Result<Document> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::update_document(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                id,
                data,
                locale,
                self.max_retries,
            )
            .await
        )
    }

    pub async fn delete_document(&mut self, collection: &str, id: &str) -> Result<Document> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::delete_document(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                id,
                self.max_retries,
            )
            .await
        )
    }
}
