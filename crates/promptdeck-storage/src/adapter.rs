// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStoreAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use promptdeck_config::model::StorageConfig;
use promptdeck_core::{
    AdapterType, Card, CardId, CardPatch, FilterOptions, HealthStatus, ListQuery, NewCard,
    PaginatedResult, PluginAdapter, PromptdeckError, RecordStoreAdapter,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed card table.
///
/// Wraps a [`Database`] handle and delegates all query operations to
/// [`queries::cards`]. The database is lazily opened on the first call to
/// [`RecordStoreAdapter::initialize`].
pub struct SqliteRecordStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteRecordStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`RecordStoreAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, PromptdeckError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    fn db(&self) -> Result<&Database, PromptdeckError> {
        self.db.get().ok_or_else(|| PromptdeckError::Storage {
            source: "record store not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), PromptdeckError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteRecordStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PromptdeckError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PromptdeckError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStoreAdapter for SqliteRecordStore {
    async fn initialize(&self) -> Result<(), PromptdeckError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PromptdeckError::Storage {
            source: "record store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite record store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PromptdeckError> {
        let db = self.db()?;
        self.checkpoint(db).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert(&self, card: &NewCard) -> Result<Card, PromptdeckError> {
        queries::cards::insert_card(self.db()?, card).await
    }

    async fn update(&self, id: &CardId, patch: &CardPatch) -> Result<Card, PromptdeckError> {
        queries::cards::update_card(self.db()?, id, patch).await
    }

    async fn delete(&self, id: &CardId) -> Result<(), PromptdeckError> {
        let removed = queries::cards::delete_card(self.db()?, id).await?;
        if !removed {
            debug!(card_id = %id, "delete of absent card row");
        }
        Ok(())
    }

    async fn get(&self, id: &CardId) -> Result<Option<Card>, PromptdeckError> {
        queries::cards::get_card(self.db()?, id).await
    }

    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult, PromptdeckError> {
        queries::cards::list_cards(self.db()?, query).await
    }

    async fn get_by_ids(&self, ids: &[CardId]) -> Result<Vec<Card>, PromptdeckError> {
        queries::cards::get_cards_by_ids(self.db()?, ids).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, PromptdeckError> {
        queries::cards::filter_options(self.db()?).await
    }
}
