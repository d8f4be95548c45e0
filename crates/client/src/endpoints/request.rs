//! Retry helper for HTTP requests with exponential backoff.
//!
//! Requests that fail with HTTP 429 (Too Many Requests) are retried with
//! exponential backoff. Every other failure is returned immediately.

use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::models::PayloadErrors;

/// Maximum number of retry attempts for rate-limited requests.
const DEFAULT_MAX_RETRIES: usize = 3;

/// Sends an HTTP request with automatic retry logic for HTTP 429 responses.
///
/// - Backoff is `2^attempt` seconds (1s, 2s, 4s, ...).
/// - `max_retries` of 0 falls back to the default of 3.
/// - Non-success responses become [`ClientError::ApiError`] with the Payload
///   error messages joined when the body carries them.
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when all retry attempts are exhausted.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
) -> Result<Response> {
    let max_retries = if max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        max_retries
    };

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None => {
                debug!("Request builder cannot be cloned, single attempt only");
                let response = builder.send().await?;
                return check_status(response).await;
            }
        };

        let response = attempt_builder.send().await?;
        if response.status().as_u16() != 429 {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request completed after retry");
            }
            return check_status(response).await;
        }

        if attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                attempt = attempt + 1,
                max_retries = max_retries + 1,
                backoff_secs,
                "Rate limited (HTTP 429), retrying with exponential backoff"
            );
            tokio::time::sleep(tokio::time::Duration::from_secs(backoff_secs)).await;
        }
    }

    debug!(
        attempts = max_retries + 1,
        "Max retries exhausted for rate-limited request"
    );
    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Turn a non-success response into an `ApiError`.
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = match serde_json::from_str::<PayloadErrors>(&body) {
        Ok(errors) if !errors.errors.is_empty() => errors.joined(),
        _ => body,
    };

    Err(ClientError::ApiError {
        status,
        url,
        message,
    })
}
