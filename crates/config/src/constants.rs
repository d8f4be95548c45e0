//! Centralized constants for the cms-migrate workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default lifetime of a Payload login token in seconds (Payload's `tokenExpiration`).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7200;

/// Buffer before token expiry that triggers a proactive re-login.
pub const DEFAULT_EXPIRY_BUFFER_SECS: u64 = 60;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound accepted for `CMS_MAX_RETRIES`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Collection that owns API keys when none is configured.
pub const DEFAULT_API_KEY_COLLECTION: &str = "users";

// =============================================================================
// Validation Defaults
// =============================================================================

/// Records sampled by the required-fields layer.
pub const DEFAULT_REQUIRED_SAMPLE_SIZE: usize = 10;

/// Records sampled by the relationship layer.
pub const DEFAULT_RELATIONSHIP_SAMPLE_SIZE: usize = 100;

/// Records sampled by the field-type layer.
pub const DEFAULT_FIELD_TYPE_SAMPLE_SIZE: usize = 10;

/// Field holding the soft-delete timestamp.
pub const DEFAULT_SOFT_DELETE_FIELD: &str = "deletedAt";

// =============================================================================
// Schema Generation Defaults
// =============================================================================

/// Maximum number of document versions kept by generated collections.
pub const DEFAULT_MAX_VERSIONS: u32 = 50;

/// Page size used when walking a collection.
pub const DEFAULT_PAGE_SIZE: usize = 100;
