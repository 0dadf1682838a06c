// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store wrapper that fails writes on demand.
//!
//! Reads always pass through to the wrapped store so tests can assert on the
//! real table after an injected failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use promptdeck_core::{
    AdapterType, Card, CardId, CardPatch, FilterOptions, HealthStatus, ListQuery, NewCard,
    PaginatedResult, PluginAdapter, PromptdeckError, RecordStoreAdapter,
};

/// Wraps any record store and injects insert, update or delete failures.
pub struct FaultyRecordStore {
    inner: Arc<dyn RecordStoreAdapter>,
    fail_insert: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
    writes: AtomicUsize,
}

impl FaultyRecordStore {
    pub fn new(inner: Arc<dyn RecordStoreAdapter>) -> Self {
        Self {
            inner,
            fail_insert: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Write calls received, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &Arc<dyn RecordStoreAdapter> {
        &self.inner
    }
}

#[async_trait]
impl PluginAdapter for FaultyRecordStore {
    fn name(&self) -> &str {
        "faulty-records"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl RecordStoreAdapter for FaultyRecordStore {
    async fn initialize(&self) -> Result<(), PromptdeckError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), PromptdeckError> {
        self.inner.close().await
    }

    async fn insert(&self, card: &NewCard) -> Result<Card, PromptdeckError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(PromptdeckError::InsertFailed {
                message: "injected insert failure".to_string(),
                source: None,
            });
        }
        self.inner.insert(card).await
    }

    async fn update(&self, id: &CardId, patch: &CardPatch) -> Result<Card, PromptdeckError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(PromptdeckError::UpdateFailed {
                id: id.clone(),
                message: "injected update failure".to_string(),
                source: None,
            });
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &CardId) -> Result<(), PromptdeckError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(PromptdeckError::DeleteFailed {
                id: id.clone(),
                message: "injected delete failure".to_string(),
                source: None,
            });
        }
        self.inner.delete(id).await
    }

    async fn get(&self, id: &CardId) -> Result<Option<Card>, PromptdeckError> {
        self.inner.get(id).await
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult, PromptdeckError> {
        self.inner.list(query).await
    }

    async fn get_by_ids(&self, ids: &[CardId]) -> Result<Vec<Card>, PromptdeckError> {
        self.inner.get_by_ids(ids).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, PromptdeckError> {
        self.inner.filter_options().await
    }
}
