// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multipart card forms.
//!
//! Create and edit submissions carry the two images as file parts and every
//! text field as a plain part with the card column's name.

use axum::extract::Multipart;

use promptdeck_core::{
    CardPatch, FileValidationError, ImageFolder, ImageUpload, PromptdeckError,
};
use promptdeck_lifecycle::{CardDraft, CardEdit};

/// Raw parts of a card form, before deciding between create and edit.
#[derive(Debug, Default)]
pub struct CardForm {
    pub output_image: Option<ImageUpload>,
    pub reference_image: Option<ImageUpload>,
    pub fields: CardPatch,
}

fn malformed(e: impl std::fmt::Display) -> PromptdeckError {
    PromptdeckError::InvalidQuery(format!("malformed multipart body: {e}"))
}

fn parse_flag(value: &str) -> Result<bool, PromptdeckError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(PromptdeckError::InvalidQuery(format!(
            "is_favorited must be a boolean, got `{other}`"
        ))),
    }
}

impl CardForm {
    /// Read every part of `multipart`. Unknown parts are ignored.
    ///
    /// A file part with no file name and no bytes is treated as absent, which
    /// is what browsers send for an untouched file input.
    pub async fn read(mut multipart: Multipart) -> Result<Self, PromptdeckError> {
        let mut form = CardForm::default();
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let folder = match name.as_str() {
                "output_image" => Some(ImageFolder::Output),
                "reference_image" => Some(ImageFolder::Reference),
                _ => None,
            };

            if let Some(folder) = folder {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let upload = ImageUpload::new(file_name, content_type, bytes.to_vec());
                match folder {
                    ImageFolder::Output => form.output_image = Some(upload),
                    ImageFolder::Reference => form.reference_image = Some(upload),
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            let fields = &mut form.fields;
            match name.as_str() {
                "prompt" => fields.prompt = Some(value),
                "metadata" => fields.metadata = Some(value),
                "client" => fields.client = Some(value),
                "model" => fields.model = Some(value),
                "seed" => fields.seed = Some(value),
                "llm_used" => fields.llm_used = Some(value),
                "notes" => fields.notes = Some(value),
                "is_favorited" => fields.is_favorited = Some(parse_flag(&value)?),
                _ => {}
            }
        }
        Ok(form)
    }

    /// A create draft. Both images are required.
    pub fn into_draft(self) -> Result<CardDraft, PromptdeckError> {
        let missing = |folder| PromptdeckError::Validation {
            folder,
            source: FileValidationError::Empty,
        };
        let output_image = self.output_image.ok_or_else(|| missing(ImageFolder::Output))?;
        let reference_image = self
            .reference_image
            .ok_or_else(|| missing(ImageFolder::Reference))?;

        let f = self.fields;
        let mut draft = CardDraft::new(
            output_image,
            reference_image,
            f.prompt.unwrap_or_default(),
            f.metadata.unwrap_or_default(),
            f.client.unwrap_or_default(),
            f.model.unwrap_or_default(),
            f.seed.unwrap_or_default(),
        );
        draft.llm_used = f.llm_used;
        draft.notes = f.notes;
        draft.is_favorited = f.is_favorited.unwrap_or(false);
        Ok(draft)
    }

    pub fn into_edit(self) -> CardEdit {
        CardEdit {
            output_image: self.output_image,
            reference_image: self.reference_image,
            fields: self.fields,
        }
    }
}
