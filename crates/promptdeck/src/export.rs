// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `promptdeck export` command implementation.

use std::path::Path;

use tracing::info;

use promptdeck_config::model::PromptdeckConfig;
use promptdeck_core::{CardId, PromptdeckError, RecordStoreAdapter};
use promptdeck_export::{ExportFormat, export};
use promptdeck_storage::SqliteRecordStore;

/// Export the cards in `ids` to `out`, or to stdout when `out` is `None`.
///
/// Unknown ids are skipped; an export that matches nothing is an error.
pub async fn run_export(
    config: &PromptdeckConfig,
    ids: &[String],
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<(), PromptdeckError> {
    let ids: Vec<CardId> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(CardId::from)
        .collect();

    let store = SqliteRecordStore::open(config.storage.clone()).await?;
    let cards = store.get_by_ids(&ids).await;
    store.close().await?;
    let cards = cards?;

    if cards.is_empty() {
        return Err(PromptdeckError::InvalidQuery(
            "none of the given ids match a card".to_string(),
        ));
    }
    if cards.len() < ids.len() {
        info!(
            requested = ids.len(),
            found = cards.len(),
            "some ids did not match a card"
        );
    }

    let content = export(&cards, format, chrono::Utc::now())?;
    match out {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .map_err(PromptdeckError::storage)?;
            info!(path = %path.display(), count = cards.len(), %format, "export written");
        }
        None => print!("{content}"),
    }
    Ok(())
}
