//! cms-migrate - Command-line front end for the Payload CMS migration toolkit.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Build the configuration each command needs and run it.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - REST API details or runner logic (see `crates/client`).
//! - Schema inference (see `crates/schema`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap env defaults.
//! - Logs and progress go to STDERR; STDOUT carries only command output.

mod args;
#[macro_use]
mod cancellation;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod formatters;
mod progress;

use args::{Cli, ConfigNeed};
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use cms_config::ConfigLoader;
use config_context::ConfigCommandContext;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Apply CLI overrides (highest priority) on top of environment values.
fn apply_cli_overrides(mut loader: ConfigLoader, cli: &Cli) -> ConfigLoader {
    if let Some(ref url) = cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(ref email) = cli.email {
        loader = loader.with_email(email.clone());
    }
    if let Some(ref password) = cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(ref key) = cli.api_key {
        loader = loader.with_api_key(key.clone());
    }
    if let Some(ref collection) = cli.auth_collection {
        loader = loader.with_auth_collection(collection.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(std::time::Duration::from_secs(timeout_secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }
    if let Some(ref url) = cli.pricing_url {
        loader = loader.with_pricing_url(url.clone());
    }
    loader
}

fn build_context(cli: &Cli) -> anyhow::Result<ConfigCommandContext> {
    let need = cli.command.config_need();
    if need == ConfigNeed::None {
        return Ok(ConfigCommandContext::Placeholder);
    }

    let loader = apply_cli_overrides(ConfigLoader::new().from_env()?, cli);

    let context = match need {
        ConfigNeed::None => ConfigCommandContext::Placeholder,
        ConfigNeed::PricingOnly => ConfigCommandContext::Pricing(loader.build_pricing()?),
        ConfigNeed::Cms | ConfigNeed::CmsAndPricing => {
            ConfigCommandContext::Real(Box::new(loader.build()?))
        }
    };
    Ok(context)
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_context = match build_context(&cli) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    // Create cancellation token and set up signal handling
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config_context, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
