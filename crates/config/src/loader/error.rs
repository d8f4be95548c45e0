//! Error types for configuration loading.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, values).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Base URL is required. Set CMS_BASE_URL or pass --base-url.")]
    MissingBaseUrl,

    #[error(
        "Authentication configuration is required (CMS_API_KEY, or CMS_EMAIL and CMS_PASSWORD)"
    )]
    MissingAuth,

    #[error("Pricing API URL is required. Set PRICING_API_URL or pass --pricing-url.")]
    MissingPricingUrl,

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid max retries: {message}")]
    InvalidMaxRetries { message: String },

    #[error("invalid session TTL configuration: {message}")]
    InvalidSessionTtl { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: only the byte index of the failure is kept, never the line.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
