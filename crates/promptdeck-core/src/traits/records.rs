// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store adapter trait for the card table.

use async_trait::async_trait;

use crate::error::PromptdeckError;
use crate::query::{ListQuery, PaginatedResult};
use crate::traits::adapter::PluginAdapter;
use crate::types::{Card, CardId, CardPatch, FilterOptions, NewCard};

/// Adapter for the single hosted card table.
///
/// Single-row operations rely on the backend's own row atomicity; nothing
/// here spans more than one row. Concurrent updates of the same card are
/// last-write-wins.
#[async_trait]
pub trait RecordStoreAdapter: PluginAdapter {
    /// Initializes the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PromptdeckError>;

    /// Closes the backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), PromptdeckError>;

    /// Insert a card and return the materialized row with its generated id and timestamp.
    ///
    /// Fails with `InsertFailed` when a required field is blank or the backend rejects the write.
    async fn insert(&self, card: &NewCard) -> Result<Card, PromptdeckError>;

    /// Apply a partial update. Fails with `NotFound` for an unknown id.
    async fn update(&self, id: &CardId, patch: &CardPatch) -> Result<Card, PromptdeckError>;

    /// Delete a card row. Deleting an absent id is not an error.
    async fn delete(&self, id: &CardId) -> Result<(), PromptdeckError>;

    /// Fetch one card.
    async fn get(&self, id: &CardId) -> Result<Option<Card>, PromptdeckError>;

    /// Filtered, sorted page window plus the exact filtered total.
    async fn list(&self, query: &ListQuery) -> Result<PaginatedResult, PromptdeckError>;

    /// Set-membership fetch; unknown ids are silently omitted.
    async fn get_by_ids(&self, ids: &[CardId]) -> Result<Vec<Card>, PromptdeckError>;

    /// Distinct clients and models, sorted.
    async fn filter_options(&self) -> Result<FilterOptions, PromptdeckError>;

    /// Set the favorite flag.
    async fn set_favorite(&self, id: &CardId, is_favorited: bool) -> Result<Card, PromptdeckError> {
        let patch = CardPatch {
            is_favorited: Some(is_favorited),
            ..Default::default()
        };
        self.update(id, &patch).await
    }
}
