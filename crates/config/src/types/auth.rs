//! Authentication types for the Payload CMS connection.
//!
//! Responsibilities:
//! - Define authentication strategies (login session, API key).
//! - Handle serialization of secret values.
//!
//! Does NOT handle:
//! - Actual authentication flow or token exchange (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Module for serializing SecretString as strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize as DeserializeTrait, Serialize as SerializeTrait};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret.expose_secret().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SecretString::new(s.into()))
    }
}

/// Strategy for authenticating with Payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthStrategy {
    /// Email and password login against an auth-enabled collection.
    /// The client exchanges them for a JWT and renews it before expiry.
    #[serde(rename = "login")]
    Login {
        email: String,
        #[serde(with = "secret_string")]
        password: SecretString,
    },
    /// Static API key issued to a document of `collection`.
    #[serde(rename = "api_key")]
    ApiKey {
        collection: String,
        #[serde(with = "secret_string")]
        key: SecretString,
    },
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// The authentication strategy to use.
    #[serde(flatten)]
    pub strategy: AuthStrategy,
    /// Collection used for login requests (`/api/{collection}/login`).
    pub auth_collection: String,
}
