//! Client builder for constructing [`PayloadClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (base_url, auth_strategy)
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # Invariants
//! - `base_url` and `auth_strategy` must be provided before calling `build()`
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use std::time::Duration;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::PayloadClient;
use crate::error::{ClientError, Result};
use cms_config::{
    AuthStrategy as ConfigAuthStrategy, Config,
    constants::{
        DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES,
        DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
    },
};

/// Builder for creating a new [`PayloadClient`].
pub struct PayloadClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    max_retries: usize,
    session_ttl_seconds: u64,
    session_expiry_buffer_seconds: u64,
}

impl Default for PayloadClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
        }
    }
}

impl PayloadClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the CMS, e.g. `https://cms.example.com`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this against development servers.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for rate-limited requests.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Fallback session lifetime when the login response carries no expiry.
    pub fn session_ttl_seconds(mut self, ttl: u64) -> Self {
        self.session_ttl_seconds = ttl;
        self
    }

    pub fn session_expiry_buffer_seconds(mut self, buffer: u64) -> Self {
        self.session_expiry_buffer_seconds = buffer;
        self
    }

    /// Pre-configure the builder from loaded configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        let auth_strategy = match &config.auth.strategy {
            ConfigAuthStrategy::Login { email, password } => AuthStrategy::Login {
                collection: config.auth.auth_collection.clone(),
                email: email.clone(),
                password: password.clone(),
            },
            ConfigAuthStrategy::ApiKey { collection, key } => AuthStrategy::ApiKey {
                collection: collection.clone(),
                key: key.clone(),
            },
        };

        self.base_url = Some(config.connection.base_url.clone());
        self.auth_strategy = Some(auth_strategy);
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.max_retries = config.connection.max_retries;
        self.session_ttl_seconds = config.connection.session_ttl_seconds;
        self.session_expiry_buffer_seconds = config.connection.session_expiry_buffer_seconds;
        self
    }

    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`PayloadClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided.
    /// Returns [`ClientError::AuthFailed`] if `auth_strategy` was not provided.
    pub fn build(self) -> Result<PayloadClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let auth_strategy = self
            .auth_strategy
            .ok_or_else(|| ClientError::AuthFailed("auth_strategy is required".to_string()))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            if base_url.starts_with("https://") {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        Ok(PayloadClient {
            http,
            base_url,
            session_manager: SessionManager::new(auth_strategy),
            max_retries: self.max_retries,
            session_ttl_seconds: self.session_ttl_seconds,
            session_expiry_buffer_seconds: self.session_expiry_buffer_seconds,
        })
    }
}
