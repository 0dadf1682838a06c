// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory object store for deterministic lifecycle tests.
//!
//! `MockObjectStore` implements `ObjectStoreAdapter` over a `HashMap`, records
//! every upload and delete it receives, and can be told to fail uploads to a
//! folder or deletes of a path.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use promptdeck_core::{
    AdapterType, HealthStatus, ImageFolder, ImageUpload, ObjectStoreAdapter, PluginAdapter,
    PromptdeckError,
};

/// One call the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectCall {
    Upload { folder: ImageFolder, path: String },
    Delete { path: String },
}

#[derive(Default)]
struct Faults {
    uploads: HashSet<ImageFolder>,
    deletes: HashSet<String>,
    all_deletes: bool,
    signing: HashSet<String>,
}

/// A mock bucket keeping objects in memory.
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<ObjectCall>>>,
    faults: Arc<Mutex<Faults>>,
    counter: AtomicU64,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
            counter: AtomicU64::new(0),
        }
    }

    /// Make every upload into `folder` fail.
    pub async fn fail_uploads_to(&self, folder: ImageFolder) {
        self.faults.lock().await.uploads.insert(folder);
    }

    /// Make deletes of `path` fail.
    pub async fn fail_delete_of(&self, path: impl Into<String>) {
        self.faults.lock().await.deletes.insert(path.into());
    }

    /// Make every delete fail.
    pub async fn fail_all_deletes(&self) {
        self.faults.lock().await.all_deletes = true;
    }

    /// Make signing `path` fail even when it exists.
    pub async fn fail_signing_of(&self, path: impl Into<String>) {
        self.faults.lock().await.signing.insert(path.into());
    }

    /// Clear every injected failure.
    pub async fn heal(&self) {
        *self.faults.lock().await = Faults::default();
    }

    /// Paths currently stored, sorted.
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.lock().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.lock().await.contains_key(path)
    }

    pub async fn calls(&self) -> Vec<ObjectCall> {
        self.calls.lock().await.clone()
    }

    /// Paths whose delete was attempted, in order, whether or not it succeeded.
    pub async fn deleted_paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                ObjectCall::Delete { path } => Some(path.clone()),
                ObjectCall::Upload { .. } => None,
            })
            .collect()
    }

    pub async fn upload_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, ObjectCall::Upload { .. }))
            .count()
    }

    fn next_path(&self, folder: ImageFolder, file: &ImageUpload) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let ext = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        format!("{}/mock-{n}.{ext}", folder.as_str())
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockObjectStore {
    fn name(&self) -> &str {
        "mock-objects"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ObjectStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        Ok(())
    }
}

#[async_trait]
impl ObjectStoreAdapter for MockObjectStore {
    async fn upload(
        &self,
        file: &ImageUpload,
        folder: ImageFolder,
    ) -> Result<String, PromptdeckError> {
        let path = self.next_path(folder, file);
        self.calls.lock().await.push(ObjectCall::Upload {
            folder,
            path: path.clone(),
        });
        if self.faults.lock().await.uploads.contains(&folder) {
            return Err(PromptdeckError::UploadFailed {
                folder,
                message: "injected upload failure".to_string(),
                source: None,
            });
        }
        self.objects
            .lock()
            .await
            .insert(path.clone(), file.bytes.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> Result<(), PromptdeckError> {
        self.calls.lock().await.push(ObjectCall::Delete {
            path: path.to_string(),
        });
        let faults = self.faults.lock().await;
        if faults.all_deletes || faults.deletes.contains(path) {
            return Err(PromptdeckError::ObjectDelete {
                path: path.to_string(),
                message: "injected delete failure".to_string(),
            });
        }
        drop(faults);
        self.objects.lock().await.remove(path);
        Ok(())
    }

    async fn read_url(&self, path: &str, ttl: Duration) -> Result<String, PromptdeckError> {
        let failing = self.faults.lock().await.signing.contains(path);
        if failing || !self.contains(path).await {
            return Err(PromptdeckError::SignError {
                path: path.to_string(),
                message: "injected signing failure".to_string(),
            });
        }
        Ok(format!("mock://{path}?ttl={}", ttl.as_secs()))
    }

    async fn exists(&self, path: &str) -> Result<bool, PromptdeckError> {
        Ok(self.contains(path).await)
    }
}
