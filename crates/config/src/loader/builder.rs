//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Build the final `Config` from loaded values and validate it.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods called after `from_env()` override environment values.
//! - An API key takes precedence over email/password when both are present.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_API_KEY_COLLECTION, DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_RETRIES,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS,
};
use crate::types::{AuthConfig, AuthStrategy, Config, ConnectionConfig, PricingConfig};

/// Configuration loader that builds config from environment variables and overrides.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    email: Option<String>,
    password: Option<SecretString>,
    api_key: Option<SecretString>,
    auth_collection: Option<String>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    session_ttl_seconds: Option<u64>,
    pricing_url: Option<String>,
    pricing_key: Option<SecretString>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            tracing::debug!("DOTENV_DISABLED is set, skipping .env");
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the login email.
    pub fn with_email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    /// Set the login password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set the auth-enabled collection slug (login endpoint and API key owner).
    pub fn with_auth_collection(mut self, collection: String) -> Self {
        self.auth_collection = Some(collection);
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the pricing API base URL.
    pub fn with_pricing_url(mut self, url: String) -> Self {
        self.pricing_url = Some(url);
        self
    }

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_key(&mut self, key: Option<SecretString>) {
        self.api_key = key;
    }

    pub(crate) fn set_auth_collection(&mut self, collection: Option<String>) {
        self.auth_collection = collection;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_session_ttl_seconds(&mut self, ttl: Option<u64>) {
        self.session_ttl_seconds = ttl;
    }

    pub(crate) fn set_pricing_url(&mut self, url: Option<String>) {
        self.pricing_url = url;
    }

    pub(crate) fn set_pricing_key(&mut self, key: Option<SecretString>) {
        self.pricing_key = key;
    }

    /// Build only the pricing settings.
    ///
    /// Used by commands that talk to the pricing API without writing to the CMS.
    pub fn build_pricing(&self) -> Result<PricingConfig, ConfigError> {
        let base_url = self
            .pricing_url
            .as_deref()
            .map(|raw| validate_and_normalize_url("pricing_url", raw))
            .transpose()?
            .ok_or(ConfigError::MissingPricingUrl)?;

        Ok(PricingConfig {
            base_url,
            api_key: self.pricing_key.clone(),
        })
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let pricing = if self.pricing_url.is_some() {
            Some(self.build_pricing()?)
        } else {
            None
        };

        let base_url = match self.base_url.as_deref() {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::MissingBaseUrl),
            Some(raw) => validate_and_normalize_url("base_url", raw)?,
            None => return Err(ConfigError::MissingBaseUrl),
        };

        let auth_collection = self
            .auth_collection
            .unwrap_or_else(|| DEFAULT_API_KEY_COLLECTION.to_string());

        if self.api_key.is_some() && (self.email.is_some() || self.password.is_some()) {
            tracing::warn!("Both an API key and login credentials are set; using the API key");
        }

        let strategy = if let Some(key) = self.api_key {
            AuthStrategy::ApiKey {
                collection: auth_collection.clone(),
                key,
            }
        } else if let (Some(email), Some(password)) = (self.email, self.password) {
            AuthStrategy::Login { email, password }
        } else {
            return Err(ConfigError::MissingAuth);
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            session_ttl_seconds: self.session_ttl_seconds.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
        };

        Self::validate_connection(&connection)?;

        Ok(Config {
            connection,
            auth: AuthConfig {
                strategy,
                auth_collection,
            },
            pricing,
        })
    }

    /// Validates timeout, retry, and session settings.
    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }

        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, connection.max_retries
                ),
            });
        }

        if connection.session_ttl_seconds <= connection.session_expiry_buffer_seconds {
            return Err(ConfigError::InvalidSessionTtl {
                message: format!(
                    "session_ttl_seconds ({}) must be greater than session_expiry_buffer_seconds ({})",
                    connection.session_ttl_seconds, connection.session_expiry_buffer_seconds
                ),
            });
        }

        Ok(())
    }
}

/// Validate an absolute http(s) URL and strip trailing slashes.
fn validate_and_normalize_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: var.into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. https://cms.example.com): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            message: "host is required (e.g. https://cms.example.com)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
