//! Authentication strategies and session management.

use cms_config::constants::DEFAULT_EXPIRY_BUFFER_SECS;
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};

/// Strategy for authenticating with the CMS.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Email and password login against an auth-enabled collection.
    /// The client manages the returned JWT.
    Login {
        collection: String,
        email: String,
        password: SecretString,
    },
    /// Static API key owned by a document in an auth-enabled collection.
    ApiKey {
        collection: String,
        key: SecretString,
    },
}

/// Manages the login JWT with expiry tracking.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    session_token: Option<SessionToken>,
}

#[derive(Debug, Clone)]
struct SessionToken {
    value: SecretString,
    expires_at: Option<Instant>,
    expiry_buffer_seconds: u64,
}

impl SessionToken {
    fn new(value: SecretString, ttl_seconds: Option<u64>, expiry_buffer_seconds: Option<u64>) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl)),
            expiry_buffer_seconds: expiry_buffer_seconds.unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()).is_zero())
            .unwrap_or(false)
    }

    /// True if the token expires within the buffer window.
    fn will_expire_soon(&self) -> bool {
        self.expires_at
            .map(|exp| {
                exp.saturating_duration_since(Instant::now())
                    < Duration::from_secs(self.expiry_buffer_seconds)
            })
            .unwrap_or(false)
    }
}

impl SessionManager {
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            session_token: None,
        }
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    /// Check if we're using API key auth (no session management needed).
    pub fn is_api_key(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::ApiKey { .. })
    }

    /// The `Authorization` header value, if one is available.
    ///
    /// API keys use `{collection} API-Key {key}`; login sessions use `JWT {token}`.
    pub fn authorization_header(&self) -> Option<String> {
        match &self.auth_strategy {
            AuthStrategy::ApiKey { collection, key } => {
                Some(format!("{} API-Key {}", collection, key.expose_secret()))
            }
            AuthStrategy::Login { .. } => self
                .session_token
                .as_ref()
                .map(|t| format!("JWT {}", t.value.expose_secret())),
        }
    }

    /// Store the token returned by a login call.
    pub fn set_session_token(
        &mut self,
        token: String,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) {
        self.session_token = Some(SessionToken::new(
            SecretString::new(token.into()),
            ttl_seconds,
            expiry_buffer_seconds,
        ));
    }

    fn check_session<F>(&self, check: F) -> bool
    where
        F: FnOnce(&SessionToken) -> bool,
    {
        if self.is_api_key() {
            return false;
        }
        self.session_token.as_ref().map(check).unwrap_or(true)
    }

    pub fn is_session_expired(&self) -> bool {
        self.check_session(|t| t.is_expired())
    }

    pub fn session_expires_soon(&self) -> bool {
        self.check_session(|t| t.will_expire_soon())
    }

    /// Clear the current session token (force re-authentication).
    pub fn clear_session(&mut self) {
        self.session_token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_strategy() -> AuthStrategy {
        AuthStrategy::Login {
            collection: "users".to_string(),
            email: "ops@example.com".to_string(),
            password: SecretString::new("pass".to_string().into()),
        }
    }

    #[test]
    fn test_api_key_header() {
        let manager = SessionManager::new(AuthStrategy::ApiKey {
            collection: "users".to_string(),
            key: SecretString::new("abc123".to_string().into()),
        });
        assert!(manager.is_api_key());
        assert_eq!(
            manager.authorization_header().as_deref(),
            Some("users API-Key abc123")
        );
        assert!(!manager.is_session_expired());
    }

    #[test]
    fn test_login_session_lifecycle() {
        let mut manager = SessionManager::new(login_strategy());
        assert!(!manager.is_api_key());
        assert!(manager.authorization_header().is_none());
        assert!(manager.is_session_expired());

        manager.set_session_token("jwt-token".to_string(), None, None);
        assert_eq!(manager.authorization_header().as_deref(), Some("JWT jwt-token"));
        assert!(!manager.is_session_expired());
        assert!(!manager.session_expires_soon());

        manager.clear_session();
        assert!(manager.is_session_expired());
    }

    #[test]
    fn test_session_within_buffer_expires_soon() {
        let mut manager = SessionManager::new(login_strategy());
        manager.set_session_token("jwt-token".to_string(), Some(30), Some(60));
        assert!(!manager.is_session_expired());
        assert!(manager.session_expires_soon());

        manager.set_session_token("jwt-token".to_string(), Some(3600), Some(60));
        assert!(!manager.session_expires_soon());
    }
}
