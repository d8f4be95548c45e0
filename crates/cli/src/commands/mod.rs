//! CLI command implementations.

pub mod content;
pub mod indexes;
pub mod pricing;
pub mod schema;
pub mod validate;

use anyhow::{Context, Result};
use cms_client::PayloadClient;
use cms_config::Config;

use crate::error::RunFailed;

/// Build a CMS client from the loaded configuration.
pub fn build_client_from_config(config: &Config) -> Result<PayloadClient> {
    PayloadClient::builder()
        .from_config(config)
        .build()
        .context("Failed to build CMS client")
}

/// Turn a finished batch run into the command result.
///
/// The report has already been printed; a run with failures still exits non-zero.
pub(crate) fn finish_run(what: &str, failures: usize) -> Result<()> {
    if failures == 0 {
        Ok(())
    } else {
        Err(RunFailed(format!("{what}: {failures} failed")).into())
    }
}
