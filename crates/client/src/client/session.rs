//! Client-level session management helpers.
//!
//! This module contains methods on [`PayloadClient`] that interact with the
//! [`SessionManager`](crate::auth::SessionManager) to produce the
//! `Authorization` header for each request.
//!
//! # Invariants
//! - [`PayloadClient::get_auth_header`] requires `&mut self` because it may trigger a login call
//! - API key authentication never triggers login; the header is returned directly
//! - Login sessions are refreshed before they expire (within the buffer window)

use crate::auth::AuthStrategy;
use crate::client::PayloadClient;
use crate::endpoints;
use crate::error::{ClientError, Result};
use secrecy::ExposeSecret;

impl PayloadClient {
    /// Get the current `Authorization` header value, logging in if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] if login fails.
    /// Returns [`ClientError::SessionExpired`] if no valid token is available.
    pub(crate) async fn get_auth_header(&mut self) -> Result<String> {
        if self.session_manager.is_api_key()
            && let Some(header) = self.session_manager.authorization_header()
        {
            return Ok(header);
        }

        if self.session_manager.is_session_expired() || self.session_manager.session_expires_soon()
        {
            self.login().await?;
        }

        self.session_manager
            .authorization_header()
            .ok_or(ClientError::SessionExpired)
    }

    /// Log in with email and password and store the returned JWT.
    ///
    /// The session lifetime follows the `exp` claim of the login response when
    /// present; otherwise the configured fallback TTL applies.
    pub async fn login(&mut self) -> Result<()> {
        let (collection, email, password) = match self.session_manager.strategy() {
            AuthStrategy::Login {
                collection,
                email,
                password,
            } => (
                collection.clone(),
                email.clone(),
                password.expose_secret().to_string(),
            ),
            AuthStrategy::ApiKey { .. } => return Ok(()),
        };

        let response = endpoints::login(
            &self.http,
            &self.base_url,
            &collection,
            &email,
            &password,
            self.max_retries,
        )
        .await?;

        let token = response
            .token
            .ok_or_else(|| ClientError::InvalidResponse("Missing token in login response".into()))?;

        let ttl = response
            .exp
            .map(|exp| exp - chrono::Utc::now().timestamp())
            .filter(|remaining| *remaining > 0)
            .map(|remaining| remaining as u64)
            .unwrap_or(self.session_ttl_seconds);

        tracing::debug!(ttl_seconds = ttl, "Login session established");
        self.session_manager.set_session_token(
            token,
            Some(ttl),
            Some(self.session_expiry_buffer_seconds),
        );
        Ok(())
    }

    /// Check if the client is using API key authentication.
    pub fn is_api_key_auth(&self) -> bool {
        self.session_manager.is_api_key()
    }
}
