//! Index management API methods for [`PayloadClient`].
//!
//! # What this module does NOT handle:
//! - Low-level index endpoint HTTP calls (in [`crate::endpoints`])
//! - Plan reconciliation (in [`crate::index_sync`])

use crate::client::PayloadClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{IndexInfo, IndexSpec};

impl PayloadClient {
    /// List the indexes that exist on a collection.
    pub async fn list_indexes(&mut self, collection: &str) -> Result<Vec<IndexInfo>> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::list_indexes(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                self.max_retries,
            )
            .await
        )
    }

    /// Create an index on a collection.
    pub async fn create_index(&mut self, collection: &str, spec: &IndexSpec) -> Result<()> {
        crate::retry_call!(
            self,
            __auth,
            endpoints::create_index(
                &self.http,
                &self.base_url,
                &__auth,
                collection,
                spec,
                self.max_retries,
            )
            .await
        )
    }
}
