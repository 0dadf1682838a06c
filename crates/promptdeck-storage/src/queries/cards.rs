// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Card CRUD, listing and lookup queries.

use chrono::{SubsecRound, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

use promptdeck_core::query::filter_value;
use promptdeck_core::{
    Card, CardId, CardPatch, FilterOptions, ListQuery, NewCard, PaginatedResult, PromptdeckError,
    SortOrder,
};

use crate::database::{map_tr_err, Database};
use crate::models::{card_from_row, format_timestamp, CARD_COLUMNS};

/// Insert a card, assigning a fresh id and creation timestamp.
pub async fn insert_card(db: &Database, card: &NewCard) -> Result<Card, PromptdeckError> {
    let missing = card.missing_fields();
    if !missing.is_empty() {
        return Err(PromptdeckError::InsertFailed {
            message: format!("missing required fields: {}", missing.join(", ")),
            source: None,
        });
    }

    let stored = Card {
        id: CardId(uuid::Uuid::new_v4().to_string()),
        output_image_path: card.output_image_path.clone(),
        reference_image_path: card.reference_image_path.clone(),
        prompt: card.prompt.clone(),
        metadata: card.metadata.clone(),
        client: card.client.clone(),
        model: card.model.clone(),
        seed: card.seed.clone(),
        llm_used: card.llm_used.clone().filter(|v| !v.trim().is_empty()),
        notes: card.notes.clone().filter(|v| !v.trim().is_empty()),
        is_favorited: card.is_favorited,
        created_at: Utc::now().trunc_subsecs(3),
    };

    let row = stored.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO cards (id, output_image_path, reference_image_path, prompt, metadata, \
                 client, model, seed, llm_used, notes, is_favorited, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    row.id.0,
                    row.output_image_path,
                    row.reference_image_path,
                    row.prompt,
                    row.metadata,
                    row.client,
                    row.model,
                    row.seed,
                    row.llm_used,
                    row.notes,
                    row.is_favorited,
                    format_timestamp(row.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| PromptdeckError::InsertFailed {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;

    Ok(stored)
}

/// Column assignments for a patch. Blank optional text clears the column.
fn patch_assignments(patch: &CardPatch) -> Vec<(&'static str, Value)> {
    let mut sets = Vec::new();
    let required = [
        ("output_image_path", &patch.output_image_path),
        ("reference_image_path", &patch.reference_image_path),
        ("prompt", &patch.prompt),
        ("metadata", &patch.metadata),
        ("client", &patch.client),
        ("model", &patch.model),
        ("seed", &patch.seed),
    ];
    for (column, value) in required {
        if let Some(v) = value {
            sets.push((column, Value::Text(v.clone())));
        }
    }
    for (column, value) in [("llm_used", &patch.llm_used), ("notes", &patch.notes)] {
        if let Some(v) = value {
            let stored = if v.trim().is_empty() {
                Value::Null
            } else {
                Value::Text(v.clone())
            };
            sets.push((column, stored));
        }
    }
    if let Some(fav) = patch.is_favorited {
        sets.push(("is_favorited", Value::Integer(i64::from(fav))));
    }
    sets
}

/// Apply a partial update and return the updated row.
pub async fn update_card(
    db: &Database,
    id: &CardId,
    patch: &CardPatch,
) -> Result<Card, PromptdeckError> {
    let blanked = patch.blanked_required_fields();
    if !blanked.is_empty() {
        return Err(PromptdeckError::UpdateFailed {
            id: id.clone(),
            message: format!("required fields cannot be blank: {}", blanked.join(", ")),
            source: None,
        });
    }

    let sets = patch_assignments(patch);
    let key = id.0.clone();
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<Card>, rusqlite::Error> {
            if !sets.is_empty() {
                let assignments = sets
                    .iter()
                    .enumerate()
                    .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "UPDATE cards SET {assignments} WHERE id = ?{}",
                    sets.len() + 1
                );
                let mut values: Vec<Value> = sets.into_iter().map(|(_, v)| v).collect();
                values.push(Value::Text(key.clone()));
                let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
                if changed == 0 {
                    return Ok(None);
                }
            }
            conn.query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![key],
                card_from_row,
            )
            .optional()
        })
        .await
        .map_err(|e| PromptdeckError::UpdateFailed {
            id: id.clone(),
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;

    updated.ok_or_else(|| PromptdeckError::NotFound { id: id.clone() })
}

/// Delete a card row. Returns whether a row was removed.
pub async fn delete_card(db: &Database, id: &CardId) -> Result<bool, PromptdeckError> {
    let key = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute("DELETE FROM cards WHERE id = ?1", params![key])?;
            Ok(removed > 0)
        })
        .await
        .map_err(|e| PromptdeckError::DeleteFailed {
            id: id.clone(),
            message: e.to_string(),
            source: Some(Box::new(e)),
        })
}

/// Fetch one card by id.
pub async fn get_card(db: &Database, id: &CardId) -> Result<Option<Card>, PromptdeckError> {
    let key = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Option<Card>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![key],
                card_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// WHERE clause and bound values for a listing's filters.
fn list_filters(query: &ListQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    if let Some(client) = filter_value(query.client.as_deref()) {
        values.push(Value::Text(client));
        clauses.push(format!("client = ?{}", values.len()));
    }
    if let Some(model) = filter_value(query.model.as_deref()) {
        values.push(Value::Text(model));
        clauses.push(format!("model = ?{}", values.len()));
    }
    if query.favorites_only {
        clauses.push("is_favorited = 1".to_string());
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (where_sql, values)
}

/// One filtered, sorted page of cards plus the exact filtered total.
pub async fn list_cards(db: &Database, query: &ListQuery) -> Result<PaginatedResult, PromptdeckError> {
    query.validate()?;

    let (where_sql, values) = list_filters(query);
    let direction = match query.sort_by {
        SortOrder::Newest => "DESC",
        SortOrder::Oldest => "ASC",
    };
    let limit = i64::from(query.page_size);
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

    let (cards, total) = db
        .connection()
        .call(move |conn| -> Result<(Vec<Card>, i64), rusqlite::Error> {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM cards{where_sql}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )?;

            let n = values.len();
            let sql = format!(
                "SELECT {CARD_COLUMNS} FROM cards{where_sql} \
                 ORDER BY created_at {direction}, rowid {direction} \
                 LIMIT ?{} OFFSET ?{}",
                n + 1,
                n + 2
            );
            let mut bound = values;
            bound.push(Value::Integer(limit));
            bound.push(Value::Integer(offset));

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bound.iter()), card_from_row)?;
            let cards = rows.collect::<Result<Vec<_>, _>>()?;
            Ok((cards, total))
        })
        .await
        .map_err(map_tr_err)?;

    Ok(PaginatedResult::new(
        cards,
        u64::try_from(total).unwrap_or(0),
        query.page,
        query.page_size,
    ))
}

/// Fetch every card whose id is in `ids`, newest first. Unknown ids are omitted.
pub async fn get_cards_by_ids(db: &Database, ids: &[CardId]) -> Result<Vec<Card>, PromptdeckError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let keys: Vec<Value> = ids.iter().map(|id| Value::Text(id.0.clone())).collect();
    db.connection()
        .call(move |conn| -> Result<Vec<Card>, rusqlite::Error> {
            let placeholders = (1..=keys.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT {CARD_COLUMNS} FROM cards WHERE id IN ({placeholders}) \
                 ORDER BY created_at DESC, rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(keys.iter()), card_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct clients and models present in the table, each sorted ascending.
pub async fn filter_options(db: &Database) -> Result<FilterOptions, PromptdeckError> {
    db.connection()
        .call(|conn| -> Result<FilterOptions, rusqlite::Error> {
            let distinct = |column: &str| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT DISTINCT {column} FROM cards ORDER BY {column} ASC"
                ))?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            };
            let clients = distinct("client")?;
            let models = distinct("model")?;
            Ok(FilterOptions { clients, models })
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    async fn open_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn sample(client: &str, model: &str) -> NewCard {
        NewCard {
            output_image_path: "Output/1-a.png".into(),
            reference_image_path: "Reference/1-b.png".into(),
            prompt: "a lighthouse at dusk".into(),
            metadata: "{}".into(),
            client: client.into(),
            model: model.into(),
            seed: "42".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let (db, _dir) = open_db().await;
        let card = insert_card(&db, &sample("Acme", "m1")).await.unwrap();
        let fetched = get_card(&db, &card.id).await.unwrap().unwrap();
        assert_eq!(fetched, card);
        assert!(!card.is_favorited);
    }

    #[tokio::test]
    async fn insert_rejects_blank_required_field() {
        let (db, _dir) = open_db().await;
        let mut card = sample("Acme", "m1");
        card.seed = "  ".into();
        let err = insert_card(&db, &card).await.unwrap_err();
        assert!(matches!(err, PromptdeckError::InsertFailed { .. }));
        assert!(err.to_string().contains("seed"));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (db, _dir) = open_db().await;
        let patch = CardPatch {
            prompt: Some("x".into()),
            ..Default::default()
        };
        let err = update_card(&db, &CardId::from("missing"), &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, PromptdeckError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_clears_optional_text_with_blank() {
        let (db, _dir) = open_db().await;
        let mut new = sample("Acme", "m1");
        new.notes = Some("keep me".into());
        let card = insert_card(&db, &new).await.unwrap();

        let patch = CardPatch {
            notes: Some(String::new()),
            prompt: Some("edited".into()),
            ..Default::default()
        };
        let updated = update_card(&db, &card.id, &patch).await.unwrap();
        assert_eq!(updated.notes, None);
        assert_eq!(updated.prompt, "edited");
        assert_eq!(updated.created_at, card.created_at);
    }

    #[tokio::test]
    async fn empty_patch_returns_current_row() {
        let (db, _dir) = open_db().await;
        let card = insert_card(&db, &sample("Acme", "m1")).await.unwrap();
        let same = update_card(&db, &card.id, &CardPatch::default()).await.unwrap();
        assert_eq!(same, card);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_went_away() {
        let (db, _dir) = open_db().await;
        let card = insert_card(&db, &sample("Acme", "m1")).await.unwrap();
        assert!(delete_card(&db, &card.id).await.unwrap());
        assert!(!delete_card(&db, &card.id).await.unwrap());
        assert!(get_card(&db, &card.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filter_options_are_distinct_and_sorted() {
        let (db, _dir) = open_db().await;
        for (client, model) in [("Zed", "m2"), ("Acme", "m1"), ("Acme", "m2")] {
            insert_card(&db, &sample(client, model)).await.unwrap();
        }
        let options = filter_options(&db).await.unwrap();
        assert_eq!(options.clients, vec!["Acme", "Zed"]);
        assert_eq!(options.models, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn lookup_by_ids_skips_unknown() {
        let (db, _dir) = open_db().await;
        let a = insert_card(&db, &sample("Acme", "m1")).await.unwrap();
        let b = insert_card(&db, &sample("Acme", "m1")).await.unwrap();
        let found = get_cards_by_ids(&db, &[a.id.clone(), CardId::from("nope"), b.id.clone()])
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(get_cards_by_ids(&db, &[]).await.unwrap().is_empty());
    }
}
