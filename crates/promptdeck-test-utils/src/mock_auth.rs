// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted auth provider.
//!
//! Maps authorization codes to the email the provider would return, so
//! callback tests can drive every branch without an HTTP server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use promptdeck_core::{
    AdapterType, AuthAdapter, AuthSession, HealthStatus, PluginAdapter, PromptdeckError,
};

#[derive(Debug, Default)]
pub struct MockAuthProvider {
    codes: Mutex<HashMap<String, String>>,
    sign_outs: AtomicUsize,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `code`, signing in as `email`.
    pub async fn accept(&self, code: &str, email: &str) {
        self.codes
            .lock()
            .await
            .insert(code.to_string(), email.to_string());
    }

    /// Number of provider-side sign-outs so far.
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockAuthProvider {
    fn name(&self) -> &str {
        "mock-auth"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for MockAuthProvider {
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, PromptdeckError> {
        let email = self
            .codes
            .lock()
            .await
            .get(code)
            .cloned()
            .ok_or_else(|| PromptdeckError::Auth {
                message: "invalid or expired authorization code".to_string(),
                source: None,
            })?;
        Ok(AuthSession {
            user_id: format!("user-{code}"),
            email,
            access_token: format!("access-{code}"),
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        })
    }

    async fn sign_out(&self, _session: &AuthSession) -> Result<(), PromptdeckError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_codes_are_auth_errors() {
        let provider = MockAuthProvider::new();
        provider.accept("good", "a@example.com").await;

        let session = provider.exchange_code("good").await.unwrap();
        assert_eq!(session.email, "a@example.com");

        let err = provider.exchange_code("bad").await.unwrap_err();
        assert!(matches!(err, PromptdeckError::Auth { .. }));
    }
}
