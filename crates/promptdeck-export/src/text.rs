// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text rendering for copying cards to the clipboard.

use chrono::{DateTime, Utc};

use promptdeck_core::Card;

const RULE_WIDTH: usize = 50;
const CARD_RULE_WIDTH: usize = 30;

/// One card as labelled sections separated by blank lines.
pub fn format_card(card: &Card) -> String {
    let mut sections = vec![
        format!("PROMPT:\n{}", card.prompt),
        format!("METADATA:\n{}", card.metadata),
        format!("CLIENT: {}", card.client),
        format!("MODEL: {}", card.model),
        format!("SEED: {}", card.seed),
    ];
    if let Some(llm) = card.llm_used.as_deref().filter(|v| !v.is_empty()) {
        sections.push(format!("LLM: {llm}"));
    }
    if let Some(notes) = card.notes.as_deref().filter(|v| !v.is_empty()) {
        sections.push(format!("NOTES:\n{notes}"));
    }
    sections.push(format!("CREATED: {}", card.created_at.format("%B %-d, %Y")));
    sections.push(format!(
        "FAVORITED: {}",
        if card.is_favorited { "Yes" } else { "No" }
    ));
    sections.join("\n\n")
}

/// A multi-card export with a header, numbered card blocks and a footer.
pub fn format_cards(cards: &[Card], exported_at: DateTime<Utc>) -> String {
    let total = cards.len();
    let plural = if total == 1 { "" } else { "s" };
    let rule = "=".repeat(RULE_WIDTH);
    let card_rule = "-".repeat(CARD_RULE_WIDTH);

    let mut out = format!(
        "PROMPT LIBRARY EXPORT\n{total} Card{plural} Selected\nExported: {}\n\n{rule}\n\n",
        exported_at.format("%B %-d, %Y, %I:%M %p UTC")
    );
    for (i, card) in cards.iter().enumerate() {
        out.push_str(&format!(
            "CARD {}/{total}\n{card_rule}\n{}\n\n",
            i + 1,
            format_card(card)
        ));
    }
    out.push_str(&rule);
    out.push_str("\n\nEnd of Export");
    out
}
