//! Environment variable tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test `CMS_*` and `PRICING_*` variables feed the loader.
//! - Test handling of empty and whitespace-only environment variables.
//! - Test builder overrides applied after `from_env()` win.

use secrecy::ExposeSecret;
use serial_test::serial;
use std::time::Duration;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::env::env_var_or_none;
use crate::loader::error::ConfigError;
use crate::types::AuthStrategy;

#[test]
#[serial]
fn test_env_vars_populate_config() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("CMS_BASE_URL", Some("https://cms.example.com")),
            ("CMS_API_KEY", Some("env-key")),
            ("CMS_TIMEOUT", Some("45")),
            ("CMS_MAX_RETRIES", Some("5")),
            ("CMS_SKIP_VERIFY", Some("true")),
            ("PRICING_API_URL", Some("https://pricing.example.com")),
            ("PRICING_API_KEY", Some("pricing-key")),
        ],
        || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();

            assert_eq!(config.connection.base_url, "https://cms.example.com");
            assert_eq!(config.connection.timeout, Duration::from_secs(45));
            assert_eq!(config.connection.max_retries, 5);
            assert!(config.connection.skip_verify);
            match config.auth.strategy {
                AuthStrategy::ApiKey { key, .. } => assert_eq!(key.expose_secret(), "env-key"),
                AuthStrategy::Login { .. } => panic!("expected API key auth"),
            }
            let pricing = config.pricing.unwrap();
            assert_eq!(pricing.base_url, "https://pricing.example.com");
            assert_eq!(
                pricing.api_key.as_ref().map(|k| k.expose_secret().to_string()),
                Some("pricing-key".to_string())
            );
        },
    );
}

#[test]
#[serial]
fn test_builder_overrides_env() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("CMS_BASE_URL", Some("https://env.example.com")),
            ("CMS_API_KEY", Some("env-key")),
        ],
        || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_base_url("https://cli.example.com".to_string())
                .build()
                .unwrap();

            assert_eq!(config.connection.base_url, "https://cli.example.com");
        },
    );
}

#[test]
#[serial]
fn test_empty_env_vars_ignored() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(
        [
            ("CMS_API_KEY", Some("")),
            ("CMS_EMAIL", Some("")),
            ("CMS_PASSWORD", Some("")),
        ],
        || {
            let config = ConfigLoader::new()
                .with_base_url("https://cms.example.com".to_string())
                .with_email("ops@example.com".to_string())
                .with_password("password".to_string())
                .from_env()
                .unwrap()
                .build()
                .unwrap();

            assert!(matches!(config.auth.strategy, AuthStrategy::Login { .. }));
        },
    );
}

#[test]
#[serial]
fn test_whitespace_only_env_var_treated_as_unset() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_var("CMS_BASE_URL", Some("   "), || {
        assert_eq!(env_var_or_none("CMS_BASE_URL"), None);
    });
}

#[test]
#[serial]
fn test_env_var_values_are_trimmed() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_var("CMS_BASE_URL", Some("  https://cms.example.com  "), || {
        assert_eq!(
            env_var_or_none("CMS_BASE_URL"),
            Some("https://cms.example.com".to_string())
        );
    });
}

#[test]
#[serial]
fn test_invalid_timeout_env_var() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_var("CMS_TIMEOUT", Some("soon"), || {
        let result = ConfigLoader::new().from_env();
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "CMS_TIMEOUT"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected CMS_TIMEOUT to be rejected"),
        }
    });
}

#[test]
#[serial]
fn test_max_retries_env_var_bounded() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_var("CMS_MAX_RETRIES", Some("99"), || {
        let result = ConfigLoader::new().from_env();
        assert!(matches!(result, Err(ConfigError::InvalidMaxRetries { .. })));
    });
}
