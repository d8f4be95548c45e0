//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Bind global connection flags to their `CMS_*` / `PRICING_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not handle config loading (see `main()` and `config_context`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "cms-migrate")]
#[command(about = "Migrate content into Payload CMS, sync indexes, and validate the result", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  cms-migrate schema inspect --root content\n  cms-migrate schema generate --root content --out src/collections\n  cms-migrate content migrate --root content --collection posts --dry-run\n  cms-migrate indexes sync --plan indexes.yaml\n  cms-migrate pricing import v1/tdsps --collection tdsps\n  cms-migrate validate --plan validation/providers.yaml --expected-count 157\n"
)]
pub struct Cli {
    /// Base URL of the Payload CMS server (e.g., http://localhost:3000)
    #[arg(short, long, global = true, env = "CMS_BASE_URL")]
    pub base_url: Option<String>,

    /// Email for login authentication
    #[arg(short, long, global = true, env = "CMS_EMAIL")]
    pub email: Option<String>,

    /// Password for login authentication
    #[arg(short, long, global = true, env = "CMS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API key (preferred over email/password)
    #[arg(short = 'k', long, global = true, env = "CMS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Auth-enabled collection that owns the login endpoint and API keys
    #[arg(long, global = true, env = "CMS_API_KEY_COLLECTION")]
    pub auth_collection: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CMS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for rate-limited requests
    #[arg(long, global = true, env = "CMS_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "CMS_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Base URL of the pricing API
    #[arg(long, global = true, env = "PRICING_API_URL")]
    pub pricing_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Suppress progress spinners.
    ///
    /// Progress indicators always write to STDERR; this flag disables them entirely.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover fields from content frontmatter and emit collection schemas
    Schema {
        #[command(subcommand)]
        command: commands::schema::SchemaCommand,
    },

    /// Run the layered validation checklist against a collection
    Validate(commands::validate::ValidateArgs),

    /// List and sync database indexes
    Indexes {
        #[command(subcommand)]
        command: commands::indexes::IndexesCommand,
    },

    /// Migrate content files into a collection
    Content {
        #[command(subcommand)]
        command: commands::content::ContentCommand,
    },

    /// Fetch records from the pricing API and import them
    Pricing {
        #[command(subcommand)]
        command: commands::pricing::PricingCommand,
    },
}

impl Commands {
    /// Which configuration the command needs before it can run.
    pub(crate) fn config_need(&self) -> ConfigNeed {
        match self {
            Commands::Schema { .. } => ConfigNeed::None,
            Commands::Pricing {
                command: commands::pricing::PricingCommand::Fetch { .. },
            } => ConfigNeed::PricingOnly,
            Commands::Pricing { .. } => ConfigNeed::CmsAndPricing,
            Commands::Validate(_) | Commands::Indexes { .. } | Commands::Content { .. } => {
                ConfigNeed::Cms
            }
        }
    }
}

/// Configuration a command requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigNeed {
    /// Works on local files only.
    None,
    PricingOnly,
    Cms,
    CmsAndPricing,
}
