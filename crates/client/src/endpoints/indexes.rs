//! Index management endpoints.
//!
//! These routes are custom collection endpoints registered by the site
//! (`GET|POST /api/{collection}/indexes`); they are not part of stock Payload.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::{encode_path_segment, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::models::{IndexInfo, IndexListResponse, IndexSpec};

fn indexes_url(base_url: &str, collection: &str) -> String {
    format!(
        "{}/api/{}/indexes",
        base_url,
        encode_path_segment(collection)
    )
}

/// List the indexes that exist on a collection.
pub async fn list_indexes(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    max_retries: usize,
) -> Result<Vec<IndexInfo>> {
    let builder = client
        .get(indexes_url(base_url, collection))
        .header("Authorization", auth_header);
    let response = send_request_with_retry(builder, max_retries).await?;

    let body: IndexListResponse = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse index list: {e}")))?;
    Ok(body.indexes)
}

/// Create an index on a collection.
pub async fn create_index(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    spec: &IndexSpec,
    max_retries: usize,
) -> Result<()> {
    debug!(collection, index = %spec.name, "Creating index");

    if spec.keys.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "index '{}' has no keys",
            spec.name
        )));
    }

    let builder = client
        .post(indexes_url(base_url, collection))
        .header("Authorization", auth_header)
        .json(spec);
    send_request_with_retry(builder, max_retries).await?;
    Ok(())
}
