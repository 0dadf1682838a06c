// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between the `cards` table and the core [`Card`] type.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use promptdeck_core::{Card, CardId};

/// Column list shared by every card SELECT, in [`card_from_row`] order.
pub const CARD_COLUMNS: &str = "id, output_image_path, reference_image_path, prompt, metadata, \
     client, model, seed, llm_used, notes, is_favorited, created_at";

/// Render a timestamp the way it is stored: RFC 3339, millisecond precision, `Z` suffix.
///
/// The fixed width keeps lexicographic order equal to chronological order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn card_from_row(row: &Row<'_>) -> Result<Card, rusqlite::Error> {
    let created_at: String = row.get(11)?;
    Ok(Card {
        id: CardId(row.get(0)?),
        output_image_path: row.get(1)?,
        reference_image_path: row.get(2)?,
        prompt: row.get(3)?,
        metadata: row.get(4)?,
        client: row.get(5)?,
        model: row.get(6)?,
        seed: row.get(7)?,
        llm_used: row.get(8)?,
        notes: row.get(9)?,
        is_favorited: row.get(10)?,
        created_at: parse_timestamp(11, &created_at)?,
    })
}
