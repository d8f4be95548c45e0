//! Authentication endpoints.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::endpoints::{encode_path_segment, send_request_with_retry};
use crate::error::{ClientError, Result};

/// Body of a successful `POST /api/{collection}/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    /// Token expiry as a Unix timestamp in seconds.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Log in to an auth-enabled collection with email and password.
pub async fn login(
    client: &Client,
    base_url: &str,
    collection: &str,
    email: &str,
    password: &str,
    max_retries: usize,
) -> Result<LoginResponse> {
    debug!("Logging in to {} as {}", collection, email);

    let url = format!(
        "{}/api/{}/login",
        base_url,
        encode_path_segment(collection)
    );
    let builder = client
        .post(&url)
        .json(&json!({ "email": email, "password": password }));

    let response = match send_request_with_retry(builder, max_retries).await {
        Ok(response) => response,
        Err(ClientError::ApiError {
            status: 400 | 401, message, ..
        }) => return Err(ClientError::AuthFailed(message)),
        Err(e) => return Err(e),
    };

    let body: LoginResponse = response.json().await?;
    if body.token.as_deref().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidResponse(
            "Missing token in login response".to_string(),
        ));
    }
    Ok(body)
}
