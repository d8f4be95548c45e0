//! Shared test utilities for cms-migrate integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write content trees and plan files into temp directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - `CMS_API_KEY` is set to "test-api-key" unless overridden.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// Authorization header the CLI sends for the default test key.
pub const API_KEY_HEADER: &str = "users API-Key test-api-key";

/// Returns a hermetic `cms-migrate` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `CMS_API_KEY` is set to a dummy value to satisfy config validation.
/// - Other connection env vars are cleared so nothing leaks from the host.
pub fn cms_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cms-migrate");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("CMS_API_KEY", "test-api-key");

    cmd.env_remove("CMS_BASE_URL")
        .env_remove("CMS_EMAIL")
        .env_remove("CMS_PASSWORD")
        .env_remove("CMS_API_KEY_COLLECTION")
        .env_remove("CMS_TIMEOUT")
        .env_remove("CMS_MAX_RETRIES")
        .env_remove("CMS_SKIP_VERIFY")
        .env_remove("PRICING_API_URL")
        .env_remove("PRICING_API_KEY")
        .env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic command pointed at `base_url`.
pub fn cms_cmd_with_base_url(base_url: &str) -> Command {
    let mut cmd = cms_cmd();
    cmd.env("CMS_BASE_URL", base_url);
    cmd
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent")).unwrap();
    fs::write(path, content).unwrap();
}
