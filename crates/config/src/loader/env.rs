//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `CMS_*` and `PRICING_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed.
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::MAX_MAX_RETRIES;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: std::str::FromStr>(var: &str, raw: &str, message: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.to_string(),
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("CMS_BASE_URL") {
        loader.set_base_url(Some(url));
    }
    if let Some(email) = env_var_or_none("CMS_EMAIL") {
        loader.set_email(Some(email));
    }
    if let Some(password) = env_var_or_none("CMS_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(key) = env_var_or_none("CMS_API_KEY") {
        loader.set_api_key(Some(SecretString::new(key.into())));
    }
    if let Some(collection) = env_var_or_none("CMS_API_KEY_COLLECTION") {
        loader.set_auth_collection(Some(collection));
    }
    if let Some(skip) = env_var_or_none("CMS_SKIP_VERIFY") {
        loader.set_skip_verify(Some(parse_env(
            "CMS_SKIP_VERIFY",
            &skip,
            "must be true or false",
        )?));
    }
    if let Some(timeout) = env_var_or_none("CMS_TIMEOUT") {
        let secs: u64 = parse_env("CMS_TIMEOUT", &timeout, "must be a number")?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = env_var_or_none("CMS_MAX_RETRIES") {
        let value: usize = parse_env(
            "CMS_MAX_RETRIES",
            &retries,
            "must be a non-negative integer",
        )?;
        if value > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!("must be between 0 and {} (got {})", MAX_MAX_RETRIES, value),
            });
        }
        loader.set_max_retries(Some(value));
    }
    if let Some(ttl) = env_var_or_none("CMS_SESSION_TTL") {
        loader.set_session_ttl_seconds(Some(parse_env(
            "CMS_SESSION_TTL",
            &ttl,
            "must be a number",
        )?));
    }
    if let Some(url) = env_var_or_none("PRICING_API_URL") {
        loader.set_pricing_url(Some(url));
    }
    if let Some(key) = env_var_or_none("PRICING_API_KEY") {
        loader.set_pricing_key(Some(SecretString::new(key.into())));
    }
    Ok(())
}
