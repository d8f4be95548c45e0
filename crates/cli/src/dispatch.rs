//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the command handlers.
//! - Extract the configuration each command needs from the context.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()` and `config_context`).
//!
//! Invariants:
//! - Every network-bound command receives the cancellation token.

use anyhow::Result;
use cms_config::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;

use crate::args::{Cli, Commands};
use crate::cancellation::CancellationToken;
use crate::commands;
use crate::commands::pricing::{PricingCommand, PricingLimits};
use crate::config_context::ConfigCommandContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(
    cli: Cli,
    config: ConfigCommandContext,
    cancel_token: &CancellationToken,
) -> Result<()> {
    match cli.command {
        Commands::Schema { command } => {
            commands::schema::run(command, &cli.output, cli.output_file)?;
        }
        Commands::Validate(args) => {
            let config = config.into_real_config()?;
            commands::validate::run(
                config,
                args,
                &cli.output,
                cli.output_file,
                cli.quiet,
                cancel_token,
            )
            .await?;
        }
        Commands::Indexes { command } => {
            let config = config.into_real_config()?;
            commands::indexes::run(
                config,
                command,
                &cli.output,
                cli.output_file,
                cli.quiet,
                cancel_token,
            )
            .await?;
        }
        Commands::Content { command } => {
            let config = config.into_real_config()?;
            commands::content::run(
                config,
                command,
                &cli.output,
                cli.output_file,
                cli.quiet,
                cancel_token,
            )
            .await?;
        }
        Commands::Pricing {
            command: PricingCommand::Fetch { endpoint },
        } => {
            let pricing = config.into_pricing_config()?;
            let limits = PricingLimits {
                timeout: Duration::from_secs(cli.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                max_retries: cli.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            };
            commands::pricing::run_fetch(
                pricing,
                limits,
                endpoint,
                &cli.output,
                cli.output_file,
                cli.quiet,
                cancel_token,
            )
            .await?;
        }
        Commands::Pricing {
            command:
                PricingCommand::Import {
                    endpoint,
                    collection,
                    dry_run,
                },
        } => {
            let (config, pricing) = config.into_real_config_with_pricing()?;
            commands::pricing::run_import(
                config,
                pricing,
                endpoint,
                collection,
                dry_run,
                &cli.output,
                cli.output_file,
                cli.quiet,
                cancel_token,
            )
            .await?;
        }
    }

    Ok(())
}
