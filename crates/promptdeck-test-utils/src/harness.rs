// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for lifecycle integration testing.
//!
//! `TestHarness` wires a temp SQLite record store (behind a
//! [`FaultyRecordStore`]) and a [`MockObjectStore`] into a [`CardLifecycle`].

use std::sync::Arc;

use promptdeck_config::model::StorageConfig;
use promptdeck_core::{Card, CardId, PromptdeckError, RecordStoreAdapter};
use promptdeck_lifecycle::{CardLifecycle, FileValidator};
use promptdeck_storage::SqliteRecordStore;

use crate::faulty_records::FaultyRecordStore;
use crate::mock_objects::MockObjectStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    max_size_mb: u64,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            max_size_mb: FileValidator::default().max_size_mb(),
        }
    }

    /// Set the upload size ceiling.
    pub fn with_max_size_mb(mut self, max_size_mb: u64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    /// Build the harness, creating the temp database and wiring the lifecycle.
    pub async fn build(self) -> Result<TestHarness, PromptdeckError> {
        let temp_dir = tempfile::TempDir::new().map_err(PromptdeckError::storage)?;
        let db_path = temp_dir.path().join("cards.db");

        let store = SqliteRecordStore::open(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        })
        .await?;
        let records = Arc::new(FaultyRecordStore::new(Arc::new(store)));
        let objects = Arc::new(MockObjectStore::new());

        let lifecycle = CardLifecycle::new(
            objects.clone(),
            records.clone(),
            FileValidator::new(self.max_size_mb),
        );

        Ok(TestHarness {
            lifecycle,
            objects,
            records,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete lifecycle environment with a mock bucket and a temp table.
pub struct TestHarness {
    pub lifecycle: CardLifecycle,
    /// The in-memory bucket.
    pub objects: Arc<MockObjectStore>,
    /// SQLite store with write-failure injection (temp DB, cleaned up on drop).
    pub records: Arc<FaultyRecordStore>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default options.
    pub async fn new() -> Result<Self, PromptdeckError> {
        Self::builder().build().await
    }

    /// Fetch a card straight from the table.
    pub async fn card(&self, id: &CardId) -> Result<Option<Card>, PromptdeckError> {
        self.records.get(id).await
    }

    /// Number of rows in the table.
    pub async fn card_count(&self) -> Result<u64, PromptdeckError> {
        let page = self
            .records
            .list(&promptdeck_core::ListQuery::new().page(1, 1))
            .await?;
        Ok(page.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cat_draft;

    #[tokio::test]
    async fn harness_creates_a_card_end_to_end() {
        let h = TestHarness::new().await.unwrap();
        let card = h.lifecycle.create(cat_draft()).await.unwrap();
        assert_eq!(h.card_count().await.unwrap(), 1);
        assert!(h.objects.contains(&card.output_image_path).await);
        assert!(h.objects.contains(&card.reference_image_path).await);
    }
}
