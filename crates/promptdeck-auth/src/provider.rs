// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted magic-link auth provider.
//!
//! The provider sends the magic link; this client only exchanges the
//! authorization code the link redirects back with, and revokes sessions.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use promptdeck_core::{
    AdapterType, AuthAdapter, AuthSession, HealthStatus, PluginAdapter, PromptdeckError,
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(alias = "error_description", alias = "msg")]
    message: String,
}

/// Auth adapter talking to the provider's token and logout endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthProvider {
    /// Creates a client for the provider at `base_url`.
    ///
    /// `api_key`, when set, is sent as the `apikey` header on every request.
    pub fn new(base_url: impl Into<String>, api_key: Option<&str>) -> Result<Self, PromptdeckError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert(
                "apikey",
                HeaderValue::from_str(key).map_err(|e| {
                    PromptdeckError::Config(format!("invalid auth api_key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PromptdeckError::Auth {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ProviderError>(&body) {
            Ok(err) => format!("provider returned {status}: {}", err.message),
            Err(_) => format!("provider returned {status}"),
        }
    }
}

#[async_trait]
impl PluginAdapter for HttpAuthProvider {
    fn name(&self) -> &str {
        "magic-link"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        match self.client.get(self.endpoint("health")).send().await {
            Ok(resp) if resp.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(resp) => Ok(HealthStatus::Degraded(format!(
                "provider returned {}",
                resp.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for HttpAuthProvider {
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, PromptdeckError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=authorization_code"))
            .json(&serde_json::json!({ "auth_code": code }))
            .send()
            .await
            .map_err(|e| PromptdeckError::Auth {
                message: format!("code exchange request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "code exchange response received");
        if !status.is_success() {
            return Err(PromptdeckError::Auth {
                message: Self::error_message(response).await,
                source: None,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PromptdeckError::Internal(format!("malformed token response: {e}")))?;

        Ok(AuthSession {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_default(),
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in.max(0)),
        })
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), PromptdeckError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| PromptdeckError::Auth {
                message: format!("sign-out request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(PromptdeckError::Auth {
                message: Self::error_message(response).await,
                source: None,
            });
        }
        debug!(user_id = %session.user_id, "provider session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let p = HttpAuthProvider::new("https://auth.example.com/", None).unwrap();
        assert_eq!(p.endpoint("token"), "https://auth.example.com/token");
    }

    #[test]
    fn invalid_api_key_is_a_config_error() {
        let err = HttpAuthProvider::new("https://auth.example.com", Some("bad\nkey")).unwrap_err();
        assert!(matches!(err, PromptdeckError::Config(_)));
    }
}
