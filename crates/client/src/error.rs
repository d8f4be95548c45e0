//! Error types for the CMS client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during CMS and pricing API operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API error response.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// Session expired and could not be renewed.
    #[error("Session expired, please re-authenticate")]
    SessionExpired,

    /// Response body did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Maximum retries exceeded on rate-limited requests.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request rejected before it was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::ApiError { status, .. } => Self::is_retryable_status(*status),
            Self::MaxRetriesExceeded(_) => true,
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 502, 503, 504: transient gateway errors
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::AuthFailed(_) | Self::SessionExpired | Self::ApiError { status: 401, .. }
        )
    }

    /// Check if the server rejected a create because the resource already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::ApiError {
                status, message, ..
            } => *status == 409 || message.to_ascii_lowercase().contains("already exists"),
            _ => false,
        }
    }
}

/// A failed unit of work in a batch run, keyed by what identifies it
/// (file path, record id, or `collection/index`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnitFailure {
    pub key: String,
    pub error: String,
}

impl UnitFailure {
    pub fn new(key: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            key: key.into(),
            error: error.to_string(),
        }
    }
}
