// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-filesystem implementation of the ObjectStoreAdapter trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use promptdeck_config::model::{ObjectsConfig, ServerConfig};
use promptdeck_core::{
    AdapterType, HealthStatus, ImageFolder, ImageUpload, ObjectStoreAdapter, PluginAdapter,
    PromptdeckError,
};

use crate::naming::{is_valid_object_path, object_path};
use crate::signing::UrlSigner;

/// Bucket rooted at a local directory with one sub-directory per [`ImageFolder`].
#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    signer: UrlSigner,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>, signer: UrlSigner) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            signer,
        }
    }

    /// Build from configuration. Without a configured key the signer is ephemeral.
    pub fn from_config(objects: &ObjectsConfig, server: &ServerConfig) -> Self {
        let signer = match &objects.signing_key {
            Some(key) => UrlSigner::new(key.as_bytes().to_vec(), server.public_base_url.clone()),
            None => {
                warn!("objects.signing_key not set; signed URLs will not survive a restart");
                UrlSigner::ephemeral(server.public_base_url.clone())
            }
        };
        Self::new(&objects.root_dir, objects.bucket.clone(), signer)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    fn full_path(&self, path: &str) -> Option<PathBuf> {
        is_valid_object_path(path).then(|| self.root.join(path))
    }

    /// Create the bucket's folder directories.
    pub async fn ensure_folders(&self) -> Result<(), PromptdeckError> {
        for folder in [ImageFolder::Output, ImageFolder::Reference] {
            fs::create_dir_all(self.root.join(folder.as_str()))
                .await
                .map_err(PromptdeckError::storage)?;
        }
        Ok(())
    }

    /// Verify a signed URL and return the object's bytes.
    pub async fn read_signed(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: i64,
    ) -> Result<Option<Vec<u8>>, PromptdeckError> {
        self.signer.verify(path, expires, signature, now)?;
        self.read(path).await
    }

    /// Raw object bytes; `None` for a missing object or a path outside the bucket.
    pub async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, PromptdeckError> {
        let Some(full) = self.full_path(path) else {
            return Ok(None);
        };
        match fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PromptdeckError::storage(e)),
        }
    }

    async fn write_new(&self, full: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(full)
            .await?;
        if let Err(e) = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await
        {
            drop(file);
            let _ = fs::remove_file(full).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for LocalObjectStore {
    fn name(&self) -> &str {
        &self.bucket
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ObjectStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        match fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "{}: {e}",
                self.root.display()
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        Ok(())
    }
}

#[async_trait]
impl ObjectStoreAdapter for LocalObjectStore {
    async fn upload(
        &self,
        file: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<String, PromptdeckError> {
        let path = object_path(folder, &file.file_name);
        let full = self.root.join(&path);
        debug!(path = %path, folder = %folder, size = file.size(), "object upload");

        self.write_new(&full, &file.bytes)
            .await
            .map_err(|e| PromptdeckError::UploadFailed {
                folder,
                message: if e.kind() == ErrorKind::AlreadyExists {
                    format!("object `{path}` already exists")
                } else {
                    e.to_string()
                },
                source: Some(Box::new(e)),
            })?;
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), PromptdeckError> {
        let full = self
            .full_path(path)
            .ok_or_else(|| PromptdeckError::ObjectDelete {
                path: path.to_string(),
                message: "invalid object path".to_string(),
            })?;
        match fs::remove_file(&full).await {
            Ok(()) => {
                debug!(path, "object deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PromptdeckError::ObjectDelete {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn read_url(&self, path: &str, ttl: Duration) -> Result<String, PromptdeckError> {
        if !self.exists(path).await? {
            return Err(PromptdeckError::SignError {
                path: path.to_string(),
                message: "object not found".to_string(),
            });
        }
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = chrono::Utc::now().timestamp().saturating_add(ttl);
        self.signer.sign(path, expires)
    }

    async fn exists(&self, path: &str) -> Result<bool, PromptdeckError> {
        match self.full_path(path) {
            Some(full) => fs::try_exists(full).await.map_err(PromptdeckError::storage),
            None => Ok(false),
        }
    }
}
