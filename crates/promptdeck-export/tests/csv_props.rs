// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV exports must read back field-for-field whatever the card text holds.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use promptdeck_core::{Card, CardId};
use promptdeck_export::export_csv;

fn card(prompt: String, notes: Option<String>) -> Card {
    Card {
        id: CardId::from("c1"),
        output_image_path: "Output/1-a.png".into(),
        reference_image_path: "Reference/1-b.png".into(),
        prompt,
        metadata: "steps=30".into(),
        client: "Acme".into(),
        model: "X".into(),
        seed: "42".into(),
        llm_used: None,
        notes,
        is_favorited: false,
        created_at: Utc.with_ymd_and_hms(2026, 3, 5, 10, 20, 30).unwrap(),
    }
}

proptest! {
    #[test]
    fn csv_reads_back_one_record_per_card(
        prompts in prop::collection::vec("[ -~\n\",']{0,40}", 0..5),
        notes in proptest::option::of("[ -~\n\",']{0,40}"),
    ) {
        let cards: Vec<Card> = prompts
            .iter()
            .map(|p| card(p.clone(), notes.clone()))
            .collect();
        let out = export_csv(&cards).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        prop_assert_eq!(records.len(), cards.len());
        for (record, card) in records.iter().zip(&cards) {
            prop_assert_eq!(&record[1], card.prompt.as_str());
            prop_assert_eq!(&record[7], card.notes.as_deref().unwrap_or(""));
            prop_assert_eq!(&record[8], "");
        }
    }
}
