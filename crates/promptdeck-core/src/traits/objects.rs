// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store adapter trait for image assets.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PromptdeckError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ImageFolder, ImageUpload};

/// Adapter for the private image bucket.
///
/// Objects are addressed by folder-namespaced paths (`Output/...`,
/// `Reference/...`) and are only ever read through time-limited URLs.
#[async_trait]
pub trait ObjectStoreAdapter: PluginAdapter {
    /// Store the file under `folder` with a freshly generated name and return its path.
    ///
    /// Never overwrites an existing object and never retries; failures are `UploadFailed`.
    async fn upload(
        &self,
        file: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<String, PromptdeckError>;

    /// Remove an object. Callers treat failure as non-fatal.
    async fn delete(&self, path: &str) -> Result<(), PromptdeckError>;

    /// Issue a bearer URL valid for `ttl`. Fails with `SignError` for a missing path.
    async fn read_url(&self, path: &str, ttl: Duration) -> Result<String, PromptdeckError>;

    /// True when an object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, PromptdeckError>;
}
