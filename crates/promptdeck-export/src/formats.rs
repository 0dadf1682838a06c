// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download formats for a selection of cards.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use promptdeck_core::{Card, PromptdeckError};

use crate::text::format_cards;

/// CSV column order.
pub const CSV_HEADER: [&str; 10] = [
    "id",
    "prompt",
    "metadata",
    "client",
    "model",
    "seed",
    "llm_used",
    "notes",
    "is_favorited",
    "created_at",
];

/// Format of an export download.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

/// `prompt-cards-YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("prompt-cards-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Pretty-printed JSON array of full card records.
pub fn export_json(cards: &[Card]) -> Result<String, PromptdeckError> {
    serde_json::to_string_pretty(cards)
        .map_err(|e| PromptdeckError::Internal(format!("failed to serialize cards: {e}")))
}

/// CSV with a bare header row and every value quoted.
///
/// Absent optionals and an unset favorite flag are empty strings.
pub fn export_csv(cards: &[Card]) -> Result<String, PromptdeckError> {
    let mut header = CSV_HEADER.join(",");
    header.push('\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(header.into_bytes());

    for card in cards {
        let created_at = card.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        writer
            .write_record([
                card.id.as_str(),
                card.prompt.as_str(),
                card.metadata.as_str(),
                card.client.as_str(),
                card.model.as_str(),
                card.seed.as_str(),
                card.llm_used.as_deref().unwrap_or(""),
                card.notes.as_deref().unwrap_or(""),
                if card.is_favorited { "true" } else { "" },
                created_at.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PromptdeckError::Internal(format!("failed to flush CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| PromptdeckError::Internal(format!("CSV is not valid UTF-8: {e}")))
}

fn csv_error(e: csv::Error) -> PromptdeckError {
    PromptdeckError::Internal(format!("failed to write CSV: {e}"))
}

/// Render `cards` in `format`.
pub fn export(
    cards: &[Card],
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<String, PromptdeckError> {
    match format {
        ExportFormat::Json => export_json(cards),
        ExportFormat::Csv => export_csv(cards),
        ExportFormat::Text => Ok(format_cards(cards, exported_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdeck_core::CardId;

    fn card(prompt: &str, notes: Option<&str>) -> Card {
        Card {
            id: CardId::from("c1"),
            output_image_path: "Output/1-a.png".into(),
            reference_image_path: "Reference/1-b.png".into(),
            prompt: prompt.into(),
            metadata: "steps=30".into(),
            client: "Acme".into(),
            model: "X".into(),
            seed: "42".into(),
            llm_used: None,
            notes: notes.map(str::to_string),
            is_favorited: true,
            created_at: DateTime::parse_from_rfc3339("2026-03-05T10:20:30.123Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn file_name_uses_iso_date_and_extension() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(
            export_file_name(ExportFormat::Csv, date),
            "prompt-cards-2026-03-05.csv"
        );
        assert_eq!(
            export_file_name(ExportFormat::Text, date),
            "prompt-cards-2026-03-05.txt"
        );
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn csv_quotes_every_value_and_doubles_quotes() {
        let out = export_csv(&[card("a \"tiny\" cat, sitting", None)]).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,prompt,metadata,client,model,seed,llm_used,notes,is_favorited,created_at"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"c1\",\"a \"\"tiny\"\" cat, sitting\",\"steps=30\",\"Acme\",\"X\",\"42\",\"\",\"\",\"true\",\"2026-03-05T10:20:30.123Z\""
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_leaves_an_unset_favorite_empty() {
        let mut plain = card("p", None);
        plain.is_favorited = false;
        let out = export_csv(&[plain]).unwrap();
        assert!(!out.contains('\r'));
        let row = out.lines().nth(1).unwrap();
        assert!(row.ends_with(",\"\",\"\",\"\",\"2026-03-05T10:20:30.123Z\""), "got: {row}");
    }

    #[test]
    fn csv_keeps_multiline_notes_in_one_record() {
        let out = export_csv(&[card("p", Some("line one\nline two"))]).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let records: Vec<_> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][7], "line one\nline two");
    }

    #[test]
    fn json_is_a_pretty_array() {
        let out = export_json(&[card("p", None)]).unwrap();
        assert!(out.starts_with("[\n"));
        let parsed: Vec<Card> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0].client, "Acme");
    }

    #[test]
    fn empty_selection_still_has_a_csv_header() {
        assert_eq!(export_csv(&[]).unwrap().lines().count(), 1);
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }
}
