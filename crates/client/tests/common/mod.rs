//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the CMS client. All integration tests should use
//! these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - All fixture files must be valid JSON
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)
//! - Test-specific assertions or test logic

use std::time::Duration;

// Re-export test utilities from cms-client
#[allow(unused_imports)]
pub use cms_client::testing::{InMemoryStore, StoreWrite, load_fixture};

// Re-export commonly used types for test convenience
// These are used via `use common::*;` in test files
#[allow(unused_imports)]
pub use cms_client::endpoints;
#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use cms_client::{AuthStrategy, PayloadClient};
use secrecy::SecretString;

/// Client against `base_url` authenticating with a static API key.
#[allow(dead_code)]
pub fn api_key_client(base_url: &str) -> PayloadClient {
    PayloadClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::ApiKey {
            collection: "users".to_string(),
            key: SecretString::new("test-api-key".to_string().into()),
        })
        .build()
        .expect("client builds")
}

/// Client against `base_url` that logs in as `ops@example.com`.
#[allow(dead_code)]
pub fn login_client(base_url: &str) -> PayloadClient {
    PayloadClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::Login {
            collection: "users".to_string(),
            email: "ops@example.com".to_string(),
            password: SecretString::new("hunter2".to_string().into()),
        })
        .build()
        .expect("client builds")
}

/// Advance Tokio's paused clock and yield so sleepers can observe the change.
#[allow(dead_code)]
pub async fn advance_and_yield(duration: Duration) {
    tokio::time::advance(duration).await;
    tokio::task::yield_now().await;
}

/// Assert that a task has not completed after yielding to the scheduler.
#[allow(dead_code)]
pub async fn assert_pending<T>(handle: &tokio::task::JoinHandle<T>, context: &str) {
    tokio::task::yield_now().await;
    assert!(!handle.is_finished(), "Expected pending task: {}", context);
}
