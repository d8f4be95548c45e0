//! Rate limit (429) retry behavior tests.
//!
//! # Invariants
//! - 429 responses trigger retry with exponential backoff (1s, 2s, 4s, ...)
//! - Exhausting retries yields `MaxRetriesExceeded` with the attempt count
//! - Other failures are never retried

mod common;

use cms_client::{ClientError, Filter};
use common::*;
use std::time::Duration;
use wiremock::matchers::{method, path};

fn count_builder(client: &Client, server_uri: &str) -> reqwest::RequestBuilder {
    client
        .get(format!("{server_uri}/api/posts/count"))
        .query(&Filter::new().is_null("deletedAt").to_query_pairs())
}

#[tokio::test(start_paused = true)]
async fn test_retry_on_429_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/count"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/posts/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"totalDocs": 4})))
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let server_uri = mock_server.uri();
    let result_handle = tokio::spawn(async move {
        let response =
            endpoints::send_request_with_retry(count_builder(&client, &server_uri), 3).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(ClientError::from)
    });

    assert_pending(&result_handle, "429 retry should wait for backoff").await;
    advance_and_yield(Duration::from_secs(1)).await;
    assert_pending(&result_handle, "second 429 retry should wait for backoff").await;
    advance_and_yield(Duration::from_secs(2)).await;
    let body = result_handle.await.expect("count task").unwrap();

    assert_eq!(body["totalDocs"], 4);
}

#[tokio::test(start_paused = true)]
async fn test_retry_on_429_exhaustion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/count"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let server_uri = mock_server.uri();
    let result_handle = tokio::spawn(async move {
        endpoints::send_request_with_retry(count_builder(&client, &server_uri), 2).await
    });

    advance_and_yield(Duration::from_secs(1)).await;
    advance_and_yield(Duration::from_secs(2)).await;
    let result = result_handle.await.expect("count task");

    assert!(matches!(result, Err(ClientError::MaxRetriesExceeded(3))));
}

#[tokio::test]
async fn test_no_retry_on_400() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/count"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errors": [{"message": "Bad where clause"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new();
    let err = endpoints::send_request_with_retry(count_builder(&client, &mock_server.uri()), 3)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ApiError { status: 400, .. }));
    assert!(!err.is_retryable());
}
