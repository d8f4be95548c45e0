//! Main Payload CMS REST API client.
//!
//! This module provides the primary [`PayloadClient`]. It handles
//! authentication and session management automatically.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Login token management helpers (private module)
//! - `documents`: Collection document methods
//! - `indexes`: Index management methods
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Low-level token storage (delegated to [`crate::auth::SessionManager`])
//!
//! # Invariants
//! - API methods handle 401/403 by clearing the login session, logging in
//!   again and retrying once. API key auth never retries.
//! - The `retry_call!` macro centralizes this retry pattern.

pub mod builder;
mod documents;
mod indexes;
mod session;

use crate::auth::SessionManager;

/// Wrap an async API call with automatic session retry on 401/403 errors.
///
/// # Usage
///
/// ```ignore
/// retry_call!(self, __auth, endpoints::some_endpoint(&self.http, &self.base_url, &__auth, arg).await)
/// ```
///
/// The placeholder `__auth` is bound to the `Authorization` header value.
#[macro_export]
macro_rules! retry_call {
    ($self:expr, $auth:ident, $call:expr) => {{
        let $auth = $self.get_auth_header().await?;
        let result = $call;

        match result {
            Ok(data) => Ok(data),
            Err($crate::error::ClientError::ApiError { status, .. })
                if (status == 401 || status == 403) && !$self.is_api_key_auth() =>
            {
                ::tracing::debug!(
                    "Session rejected (status {}), clearing and re-authenticating...",
                    status
                );
                $self.session_manager.clear_session();
                let $auth = $self.get_auth_header().await?;
                $call
            }
            Err(e) => Err(e),
        }
    }};
}

/// Payload CMS REST API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use cms_client::{AuthStrategy, PayloadClient};
/// use secrecy::SecretString;
///
/// let client = PayloadClient::builder()
///     .base_url("https://cms.example.com".to_string())
///     .auth_strategy(AuthStrategy::ApiKey {
///         collection: "users".to_string(),
///         key: SecretString::new("my-key".to_string().into()),
///     })
///     .build()?;
/// ```
#[derive(Debug)]
pub struct PayloadClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session_manager: SessionManager,
    pub(crate) max_retries: usize,
    pub(crate) session_ttl_seconds: u64,
    pub(crate) session_expiry_buffer_seconds: u64,
}

impl PayloadClient {
    /// Create a new client builder.
    pub fn builder() -> builder::PayloadClientBuilder {
        builder::PayloadClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthStrategy;
    use crate::error::ClientError;
    use secrecy::SecretString;

    fn api_key() -> AuthStrategy {
        AuthStrategy::ApiKey {
            collection: "users".to_string(),
            key: SecretString::new("test-key".to_string().into()),
        }
    }

    #[test]
    fn test_client_builder_with_api_key() {
        let client = PayloadClient::builder()
            .base_url("https://cms.example.com".to_string())
            .auth_strategy(api_key())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://cms.example.com");
        assert!(client.is_api_key_auth());
    }

    #[test]
    fn test_client_builder_missing_base_url() {
        let client = PayloadClient::builder().auth_strategy(api_key()).build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_client_builder_missing_auth() {
        let client = PayloadClient::builder()
            .base_url("https://cms.example.com".to_string())
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_client_builder_normalizes_base_url() {
        let client = PayloadClient::builder()
            .base_url("https://cms.example.com//".to_string())
            .auth_strategy(api_key())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://cms.example.com");
    }
}
