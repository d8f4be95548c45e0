//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ClientError`, `SchemaError` and aggregate run failures to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-8 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use cms_client::ClientError;
use cms_schema::SchemaError;
use thiserror::Error;

/// Structured exit codes for cms-migrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - invalid credentials or expired session.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, or DNS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Resource not found - document, collection, content root.
    NotFound = 4,

    /// Validation error - bad input, failed validation layer, or a batch
    /// run with per-unit failures.
    ValidationError = 5,

    /// Permission denied - insufficient privileges.
    PermissionDenied = 6,

    /// Rate limited - HTTP 429 after retries were exhausted.
    RateLimited = 7,

    /// Service unavailable - HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::ServiceUnavailable
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            // Authentication errors (exit code 2)
            ClientError::AuthFailed(_) => ExitCode::AuthenticationFailed,
            ClientError::SessionExpired => ExitCode::AuthenticationFailed,
            ClientError::ApiError { status: 401, .. } => ExitCode::AuthenticationFailed,

            // Connection errors (exit code 3)
            ClientError::InvalidUrl(_) => ExitCode::ConnectionError,

            // Not found (exit code 4)
            ClientError::NotFound(_) => ExitCode::NotFound,
            ClientError::ApiError { status: 404, .. } => ExitCode::NotFound,

            // Validation errors (exit code 5)
            ClientError::InvalidRequest(_) => ExitCode::ValidationError,
            ClientError::InvalidResponse(_) => ExitCode::ValidationError,
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,

            // Permission denied (exit code 6)
            ClientError::ApiError { status: 403, .. } => ExitCode::PermissionDenied,

            // Rate limited (exit code 7); only 429s are retried to exhaustion
            ClientError::MaxRetriesExceeded(_) => ExitCode::RateLimited,
            ClientError::ApiError { status: 429, .. } => ExitCode::RateLimited,

            // Service unavailable (exit code 8)
            ClientError::ApiError {
                status: 502..=504, ..
            } => ExitCode::ServiceUnavailable,

            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            ClientError::ApiError { .. } => ExitCode::GeneralError,
        }
    }
}

impl From<&SchemaError> for ExitCode {
    fn from(err: &SchemaError) -> Self {
        match err {
            SchemaError::NotADirectory(_) => ExitCode::NotFound,
            SchemaError::Io { .. } => ExitCode::GeneralError,
            SchemaError::MissingFrontmatter(_)
            | SchemaError::UnterminatedFrontmatter(_)
            | SchemaError::Yaml { .. }
            | SchemaError::NotAMapping(_) => ExitCode::ValidationError,
        }
    }
}

/// A command ran to completion but some of its units failed, or a
/// validation layer did not pass.
///
/// The command has already printed its report; this only carries the
/// summary line and the exit code.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct RunFailed(pub String);

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if let Some(schema_err) = cause.downcast_ref::<SchemaError>() {
                return ExitCode::from(schema_err);
            }
            if cause.is::<RunFailed>() {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}
