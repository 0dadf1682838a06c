// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inputs to the create and update paths.

use promptdeck_core::{CardPatch, ImageUpload, NewCard};

/// Everything needed to create a card: both images plus its text fields.
#[derive(Debug, Clone)]
pub struct CardDraft {
    pub output_image: ImageUpload,
    pub reference_image: ImageUpload,
    pub prompt: String,
    pub metadata: String,
    pub client: String,
    pub model: String,
    pub seed: String,
    pub llm_used: Option<String>,
    pub notes: Option<String>,
    pub is_favorited: bool,
}

impl CardDraft {
    /// Draft with the required fields; optional fields start empty.
    pub fn new(
        output_image: ImageUpload,
        reference_image: ImageUpload,
        prompt: impl Into<String>,
        metadata: impl Into<String>,
        client: impl Into<String>,
        model: impl Into<String>,
        seed: impl Into<String>,
    ) -> Self {
        Self {
            output_image,
            reference_image,
            prompt: prompt.into(),
            metadata: metadata.into(),
            client: client.into(),
            model: model.into(),
            seed: seed.into(),
            llm_used: None,
            notes: None,
            is_favorited: false,
        }
    }

    pub fn llm_used(mut self, llm_used: impl Into<String>) -> Self {
        self.llm_used = Some(llm_used.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Required text fields that are blank. Image paths are not checked here.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.to_new_card(String::from("-"), String::from("-"))
            .missing_fields()
    }

    /// The row to insert once both images are stored.
    pub fn to_new_card(&self, output_image_path: String, reference_image_path: String) -> NewCard {
        NewCard {
            output_image_path,
            reference_image_path,
            prompt: self.prompt.clone(),
            metadata: self.metadata.clone(),
            client: self.client.clone(),
            model: self.model.clone(),
            seed: self.seed.clone(),
            llm_used: self.llm_used.clone(),
            notes: self.notes.clone(),
            is_favorited: self.is_favorited,
        }
    }
}

/// A partial update: optional replacement images plus field changes.
///
/// Image paths in `fields` are ignored; they are set only from stored replacements.
#[derive(Debug, Clone, Default)]
pub struct CardEdit {
    pub output_image: Option<ImageUpload>,
    pub reference_image: Option<ImageUpload>,
    pub fields: CardPatch,
}

impl CardEdit {
    pub fn fields(fields: CardPatch) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn with_output_image(mut self, image: ImageUpload) -> Self {
        self.output_image = Some(image);
        self
    }

    pub fn with_reference_image(mut self, image: ImageUpload) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn replaces_images(&self) -> bool {
        self.output_image.is_some() || self.reference_image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageUpload {
        ImageUpload::new("a.png", "image/png", vec![1])
    }

    #[test]
    fn missing_fields_ignores_paths() {
        let draft = CardDraft::new(png(), png(), "p", "", "c", "m", " ");
        assert_eq!(draft.missing_fields(), vec!["metadata", "seed"]);
    }

    #[test]
    fn new_card_carries_optional_fields() {
        let draft = CardDraft::new(png(), png(), "p", "m", "c", "mo", "1")
            .llm_used("gpt")
            .notes("n");
        let row = draft.to_new_card("Output/a".into(), "Reference/b".into());
        assert_eq!(row.llm_used.as_deref(), Some("gpt"));
        assert_eq!(row.notes.as_deref(), Some("n"));
        assert_eq!(row.output_image_path, "Output/a");
    }

    #[test]
    fn field_only_edit_replaces_no_images() {
        assert!(!CardEdit::fields(CardPatch::default()).replaces_images());
        assert!(CardEdit::default().with_output_image(png()).replaces_images());
    }
}
