//! Connection configuration types for cms-migrate.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeouts, retries).
//! - Define the main `Config` structure combining connection, auth, and pricing.
//! - Provide serialization helpers for `Duration`.
//!
//! Does NOT handle:
//! - Configuration loading from env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - Default values come from `constants`, not magic numbers.

use crate::constants::{
    DEFAULT_API_KEY_COLLECTION, DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_RETRIES,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::{AuthConfig, AuthStrategy};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Connection configuration for the Payload server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the site (e.g., https://cms.example.com); `/api` is appended by the client
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Request timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum number of retries for rate-limited requests
    pub max_retries: usize,
    /// Lifetime of a login token in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Refresh the login token when it expires within this many seconds
    #[serde(default = "default_session_expiry_buffer")]
    pub session_expiry_buffer_seconds: u64,
}

pub(crate) fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

pub(crate) fn default_session_expiry_buffer() -> u64 {
    DEFAULT_EXPIRY_BUFFER_SECS
}

/// Third-party pricing API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Base URL of the pricing API
    pub base_url: String,
    /// Optional bearer key
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Pricing API settings, when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingConfig>,
}

impl Config {
    /// Create a config that authenticates with an API key owned by `users`.
    pub fn with_api_key(base_url: String, key: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::ApiKey {
                    collection: DEFAULT_API_KEY_COLLECTION.to_string(),
                    key,
                },
                auth_collection: DEFAULT_API_KEY_COLLECTION.to_string(),
            },
            pricing: None,
        }
    }

    /// Create a config that logs in with email and password.
    pub fn with_login(base_url: String, email: String, password: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::Login { email, password },
                auth_collection: DEFAULT_API_KEY_COLLECTION.to_string(),
            },
            pricing: None,
        }
    }
}

impl ConnectionConfig {
    /// Connection settings with default timeouts for `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
        }
    }
}
