// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for the magic-link provider.

use async_trait::async_trait;

use crate::error::PromptdeckError;
use crate::traits::adapter::PluginAdapter;
use crate::types::AuthSession;

/// Adapter for the hosted authentication provider.
///
/// The provider delivers magic links; the gateway only sees the
/// authorization code that the link redirects back with.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Exchange an authorization code for a session.
    async fn exchange_code(&self, code: &str) -> Result<AuthSession, PromptdeckError>;

    /// Revoke the session at the provider.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), PromptdeckError>;
}
