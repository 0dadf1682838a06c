// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Magic-link callback handling.
//!
//! Turns the `code` query parameter into either a registered session token or
//! one of the login-page error codes.

use std::sync::Arc;

use strum::{Display, EnumString};
use tracing::{error, info, warn};

use promptdeck_config::model::AuthConfig;
use promptdeck_core::{AuthAdapter, AuthSession, PromptdeckError};

use crate::domain::DomainPolicy;
use crate::session::SessionRegistry;

/// Error code appended to the login redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum CallbackError {
    NoCode,
    AuthFailed,
    InvalidDomain,
    CallbackFailed,
}

impl CallbackError {
    /// Where the browser is sent for this error.
    pub fn login_redirect(&self) -> String {
        format!("/auth/login?error={self}")
    }
}

/// The provider adapter, the domain gate and the session registry together.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthAdapter>,
    policy: DomainPolicy,
    sessions: Arc<SessionRegistry>,
    cookie_name: String,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthAdapter>,
        policy: DomainPolicy,
        sessions: Arc<SessionRegistry>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            policy,
            sessions,
            cookie_name: cookie_name.into(),
        }
    }

    /// Wire a service from the `[auth]` section around an existing provider.
    pub fn from_config(provider: Arc<dyn AuthAdapter>, config: &AuthConfig) -> Self {
        let ttl = i64::try_from(config.session_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        Self::new(
            provider,
            DomainPolicy::new(&config.allowed_email_domain),
            Arc::new(SessionRegistry::new(ttl)),
            config.session_cookie.clone(),
        )
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn policy(&self) -> &DomainPolicy {
        &self.policy
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn provider(&self) -> &Arc<dyn AuthAdapter> {
        &self.provider
    }

    /// Complete a sign-in from the callback's `code` parameter.
    ///
    /// On success returns the new session token. A session whose email is
    /// outside the allowed domain is signed out at the provider before
    /// `InvalidDomain` is returned.
    pub async fn complete_sign_in(&self, code: Option<&str>) -> Result<String, CallbackError> {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Err(CallbackError::NoCode);
        };

        let session = match self.provider.exchange_code(code).await {
            Ok(session) => session,
            Err(PromptdeckError::Auth { message, .. }) => {
                warn!(error = %message, "authorization code exchange failed");
                return Err(CallbackError::AuthFailed);
            }
            Err(e) => {
                error!(error = %e, "auth callback processing failed");
                return Err(CallbackError::CallbackFailed);
            }
        };

        if let Err(e) = self.policy.check(&session.email) {
            warn!(user_id = %session.user_id, error = %e, "sign-in rejected");
            self.revoke_at_provider(&session).await;
            return Err(CallbackError::InvalidDomain);
        }

        info!(user_id = %session.user_id, "user signed in");
        Ok(self.sessions.register(session))
    }

    /// Sign out the session behind `token`. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) {
        if let Some(session) = self.sessions.revoke(token) {
            self.revoke_at_provider(&session).await;
            info!(user_id = %session.user_id, "user signed out");
        }
    }

    async fn revoke_at_provider(&self, session: &AuthSession) {
        if let Err(e) = self.provider.sign_out(session).await {
            warn!(user_id = %session.user_id, error = %e, "provider sign-out failed");
        }
    }
}
