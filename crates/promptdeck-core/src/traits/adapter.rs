// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and health surface shared by every gallery backend.

use async_trait::async_trait;

use crate::error::PromptdeckError;
use crate::types::{AdapterType, HealthStatus};

/// Supertrait of the card table, the image bucket and the auth provider.
///
/// `promptdeck check` and the `/health` endpoint only see backends through
/// this trait.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short name used in logs, e.g. `sqlite`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Probe the backend. `Err` means the probe itself could not run.
    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError>;

    /// Release connections and file handles. Called once at shutdown.
    async fn shutdown(&self) -> Result<(), PromptdeckError>;
}
