//! Collection document endpoints.

use cms_schema::FieldMap;
use reqwest::Client;
use tracing::debug;

use crate::endpoints::{FindQuery, encode_path_segment, send_request_with_retry};
use crate::endpoints::query::Filter;
use crate::error::{ClientError, Result};
use crate::models::{CountResponse, DocResponse, Document, DocumentPage};

fn collection_url(base_url: &str, collection: &str) -> String {
    format!("{}/api/{}", base_url, encode_path_segment(collection))
}

fn document_url(base_url: &str, collection: &str, id: &str) -> String {
    format!(
        "{}/{}",
        collection_url(base_url, collection),
        encode_path_segment(id)
    )
}

fn locale_pairs(locale: Option<&str>) -> Vec<(&'static str, String)> {
    locale
        .map(|l| vec![("locale", l.to_string())])
        .unwrap_or_default()
}

/// Query a collection.
pub async fn find_documents(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    query: &FindQuery,
    max_retries: usize,
) -> Result<DocumentPage> {
    let url = collection_url(base_url, collection);
    debug!(collection, "Finding documents");

    let builder = client
        .get(&url)
        .header("Authorization", auth_header)
        .query(&query.to_query_pairs());
    let response = send_request_with_retry(builder, max_retries).await?;

    response
        .json::<DocumentPage>()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse document page: {e}")))
}

/// Fetch one document by id. A 404 is `Ok(None)`.
pub async fn find_document_by_id(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    id: &str,
    depth: Option<u8>,
    max_retries: usize,
) -> Result<Option<Document>> {
    let url = document_url(base_url, collection, id);

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(depth) = depth {
        params.push(("depth", depth.to_string()));
    }

    let builder = client
        .get(&url)
        .header("Authorization", auth_header)
        .query(&params);

    match send_request_with_retry(builder, max_retries).await {
        Ok(response) => Ok(Some(response.json::<Document>().await?)),
        Err(ClientError::ApiError { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Count documents matching `filter`.
pub async fn count_documents(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    filter: &Filter,
    max_retries: usize,
) -> Result<u64> {
    let url = format!("{}/count", collection_url(base_url, collection));

    let builder = client
        .get(&url)
        .header("Authorization", auth_header)
        .query(&filter.to_query_pairs());
    let response = send_request_with_retry(builder, max_retries).await?;

    let body: CountResponse = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse count: {e}")))?;
    Ok(body.total_docs)
}

/// Create a document.
pub async fn create_document(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    data: &FieldMap,
    locale: Option<&str>,
    max_retries: usize,
) -> Result<Document> {
    let url = collection_url(base_url, collection);
    debug!(collection, locale, "Creating document");

    let builder = client
        .post(&url)
        .header("Authorization", auth_header)
        .query(&locale_pairs(locale))
        .json(data);
    let response = send_request_with_retry(builder, max_retries).await?;

    let body: DocResponse = response.json().await?;
    Ok(body.doc)
}

/// Patch a document.
#[allow(clippy::too_many_arguments)]
pub async fn update_document(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    id: &str,
    data: &FieldMap,
    locale: Option<&str>,
    max_retries: usize,
) -> Result<Document> {
    let url = document_url(base_url, collection, id);
    debug!(collection, id, locale, "Updating document");

    let builder = client
        .patch(&url)
        .header("Authorization", auth_header)
        .query(&locale_pairs(locale))
        .json(data);
    let response = send_request_with_retry(builder, max_retries).await?;

    let body: DocResponse = response.json().await?;
    Ok(body.doc)
}

/// Delete a document.
pub async fn delete_document(
    client: &Client,
    base_url: &str,
    auth_header: &str,
    collection: &str,
    id: &str,
    max_retries: usize,
) -> Result<Document> {
    let url = document_url(base_url, collection, id);
    debug!(collection, id, "Deleting document");

    let builder = client.delete(&url).header("Authorization", auth_header);
    let response = send_request_with_retry(builder, max_retries).await?;

    let body: DocResponse = response.json().await?;
    Ok(body.doc)
}
