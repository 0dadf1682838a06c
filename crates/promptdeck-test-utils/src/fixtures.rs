// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample uploads and drafts.

use promptdeck_core::{ImageUpload, NewCard};
use promptdeck_lifecycle::CardDraft;

/// Smallest byte sequence that starts like a PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub fn png(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/png", PNG_BYTES.to_vec())
}

pub fn jpeg(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/jpeg", vec![0xff, 0xd8, 0xff, 0xe0])
}

/// The "a cat" draft: client Acme, model X, seed 42.
pub fn cat_draft() -> CardDraft {
    CardDraft::new(
        png("out.png"),
        jpeg("ref.jpg"),
        "a cat",
        "steps=30",
        "Acme",
        "X",
        "42",
    )
}

/// A row ready for direct insertion, bypassing the object store.
pub fn new_card(prompt: &str, client: &str, model: &str) -> NewCard {
    NewCard {
        output_image_path: format!("Output/{prompt}.png"),
        reference_image_path: format!("Reference/{prompt}.png"),
        prompt: prompt.to_string(),
        metadata: "steps=30".to_string(),
        client: client.to_string(),
        model: model.to_string(),
        seed: "1".to_string(),
        ..Default::default()
    }
}
