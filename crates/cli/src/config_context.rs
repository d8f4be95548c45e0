//! Configuration context for command execution.
//!
//! Responsibilities:
//! - Distinguish real, pricing-only, and placeholder configs at compile time.
//! - Provide type-safe extraction of config for commands that need it.
//!
//! Does NOT handle:
//! - Configuration loading (done in `main()`).
//!
//! Invariants:
//! - Placeholder configs cannot be used for CMS or pricing API connections.
//! - Real configs are validated before command execution.

use cms_config::{Config, ConfigError, PricingConfig};

/// Context for command execution.
pub(crate) enum ConfigCommandContext {
    /// A validated CMS config (pricing settings included when configured).
    Real(Box<Config>),
    /// Pricing API settings only, for commands that never touch the CMS.
    Pricing(PricingConfig),
    /// For commands that only read and write local files.
    Placeholder,
}

impl ConfigCommandContext {
    /// Extract the real config, failing if this is not one.
    pub(crate) fn into_real_config(self) -> anyhow::Result<Config> {
        match self {
            ConfigCommandContext::Real(config) => Ok(*config),
            ConfigCommandContext::Pricing(_) | ConfigCommandContext::Placeholder => {
                anyhow::bail!(
                    "Internal error: attempted to use placeholder config for an operation requiring real connection details"
                )
            }
        }
    }

    /// Extract the real config and its pricing settings.
    pub(crate) fn into_real_config_with_pricing(self) -> anyhow::Result<(Config, PricingConfig)> {
        let config = self.into_real_config()?;
        let pricing = config
            .pricing
            .clone()
            .ok_or(ConfigError::MissingPricingUrl)?;
        Ok((config, pricing))
    }

    /// Extract pricing settings from either a real or a pricing-only config.
    pub(crate) fn into_pricing_config(self) -> anyhow::Result<PricingConfig> {
        match self {
            ConfigCommandContext::Pricing(pricing) => Ok(pricing),
            ConfigCommandContext::Real(config) => {
                Ok(config.pricing.ok_or(ConfigError::MissingPricingUrl)?)
            }
            ConfigCommandContext::Placeholder => {
                anyhow::bail!(
                    "Internal error: attempted to use placeholder config for an operation requiring pricing API details"
                )
            }
        }
    }
}
