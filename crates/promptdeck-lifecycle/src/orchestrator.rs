// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The card lifecycle orchestrator.
//!
//! Sequences uploads, the single row write and the deletes around it. There
//! is no transaction spanning an upload and a write, so every forward-path
//! failure after an upload is followed by a compensating delete of what this
//! run stored. Compensation and cleanup deletes are best-effort: their
//! failures are logged and never replace the error returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use promptdeck_core::{
    Card, CardId, CardUrls, ImageFolder, ImageUpload, ObjectStoreAdapter, PromptdeckError,
    RecordStoreAdapter,
};

use crate::draft::{CardDraft, CardEdit};
use crate::state::{LifecycleState, Operation};
use crate::validator::FileValidator;

/// Default lifetime of issued read URLs.
pub const DEFAULT_URL_TTL: Duration = Duration::from_secs(3600);

/// Logging context for one state machine run.
struct Run<'a> {
    op: Operation,
    card_id: Option<&'a CardId>,
}

impl<'a> Run<'a> {
    fn new(op: Operation, card_id: Option<&'a CardId>) -> Self {
        let run = Self { op, card_id };
        run.enter(LifecycleState::Idle);
        run
    }

    fn card(&self) -> &str {
        self.card_id.map(CardId::as_str).unwrap_or("-")
    }

    fn enter(&self, state: LifecycleState) {
        debug!(op = %self.op, card_id = self.card(), state = %state, "lifecycle transition");
    }
}

/// Coordinates the object store and the record store for card mutations.
#[derive(Clone)]
pub struct CardLifecycle {
    objects: Arc<dyn ObjectStoreAdapter>,
    records: Arc<dyn RecordStoreAdapter>,
    validator: FileValidator,
}

impl CardLifecycle {
    pub fn new(
        objects: Arc<dyn ObjectStoreAdapter>,
        records: Arc<dyn RecordStoreAdapter>,
        validator: FileValidator,
    ) -> Self {
        Self {
            objects,
            records,
            validator,
        }
    }

    pub fn objects(&self) -> &Arc<dyn ObjectStoreAdapter> {
        &self.objects
    }

    pub fn records(&self) -> &Arc<dyn RecordStoreAdapter> {
        &self.records
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    fn validate(&self, file: &ImageUpload, folder: ImageFolder) -> Result<(), PromptdeckError> {
        self.validator
            .validate(file)
            .map_err(|source| PromptdeckError::Validation { folder, source })
    }

    /// Delete `paths` concurrently, logging and swallowing every failure.
    async fn discard(&self, run: &Run<'_>, state: LifecycleState, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        run.enter(state);
        let results = join_all(paths.iter().map(|path| self.objects.delete(path))).await;
        for (path, result) in paths.iter().zip(results) {
            if let Err(e) = result {
                warn!(
                    op = %run.op,
                    card_id = run.card(),
                    state = %state,
                    path = %path,
                    error = %e,
                    "best-effort object delete failed"
                );
            }
        }
    }

    /// Create a card from two images and its fields.
    ///
    /// Both files are validated before any upload. A failed reference upload
    /// removes the stored output image; a failed insert removes both images.
    pub async fn create(&self, draft: CardDraft) -> Result<Card, PromptdeckError> {
        let run = Run::new(Operation::Create, None);

        run.enter(LifecycleState::ValidatingFiles);
        self.validate(&draft.output_image, ImageFolder::Output)?;
        self.validate(&draft.reference_image, ImageFolder::Reference)?;
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(PromptdeckError::InsertFailed {
                message: format!("missing required fields: {}", missing.join(", ")),
                source: None,
            });
        }

        run.enter(LifecycleState::UploadingOutput);
        let output_path = self
            .objects
            .upload(&draft.output_image, ImageFolder::Output)
            .await?;

        run.enter(LifecycleState::UploadingReference);
        let reference_path = match self
            .objects
            .upload(&draft.reference_image, ImageFolder::Reference)
            .await
        {
            Ok(path) => path,
            Err(e) => {
                self.discard(&run, LifecycleState::RollingBack, &[output_path])
                    .await;
                return Err(e);
            }
        };

        run.enter(LifecycleState::InsertingRecord);
        let row = draft.to_new_card(output_path.clone(), reference_path.clone());
        match self.records.insert(&row).await {
            Ok(card) => {
                let done = Run {
                    op: run.op,
                    card_id: Some(&card.id),
                };
                done.enter(LifecycleState::Done);
                Ok(card)
            }
            Err(e) => {
                self.discard(
                    &run,
                    LifecycleState::RollingBack,
                    &[output_path, reference_path],
                )
                .await;
                Err(e)
            }
        }
    }

    /// Update fields and optionally replace either image.
    ///
    /// Replacement images are uploaded before the row write; if that write
    /// fails only the new uploads are removed. Superseded images are removed
    /// after the write succeeds.
    pub async fn update(&self, id: &CardId, edit: CardEdit) -> Result<Card, PromptdeckError> {
        let run = Run::new(Operation::Update, Some(id));

        run.enter(LifecycleState::ValidatingFiles);
        if let Some(file) = &edit.output_image {
            self.validate(file, ImageFolder::Output)?;
        }
        if let Some(file) = &edit.reference_image {
            self.validate(file, ImageFolder::Reference)?;
        }
        let blanked = edit.fields.blanked_required_fields();
        if !blanked.is_empty() {
            return Err(PromptdeckError::UpdateFailed {
                id: id.clone(),
                message: format!("required fields cannot be blank: {}", blanked.join(", ")),
                source: None,
            });
        }
        let current = self
            .records
            .get(id)
            .await?
            .ok_or_else(|| PromptdeckError::NotFound { id: id.clone() })?;

        let mut patch = edit.fields;
        patch.output_image_path = None;
        patch.reference_image_path = None;
        let mut uploaded: Vec<String> = Vec::new();
        let mut superseded: Vec<String> = Vec::new();

        if let Some(file) = &edit.output_image {
            run.enter(LifecycleState::UploadingOutput);
            let path = self.objects.upload(file, ImageFolder::Output).await?;
            uploaded.push(path.clone());
            superseded.push(current.output_image_path.clone());
            patch.output_image_path = Some(path);
        }

        if let Some(file) = &edit.reference_image {
            run.enter(LifecycleState::UploadingReference);
            match self.objects.upload(file, ImageFolder::Reference).await {
                Ok(path) => {
                    uploaded.push(path.clone());
                    superseded.push(current.reference_image_path.clone());
                    patch.reference_image_path = Some(path);
                }
                Err(e) => {
                    self.discard(&run, LifecycleState::RollingBack, &uploaded)
                        .await;
                    return Err(e);
                }
            }
        }

        run.enter(LifecycleState::Updating);
        let card = match self.records.update(id, &patch).await {
            Ok(card) => card,
            Err(e) => {
                self.discard(&run, LifecycleState::RollingBack, &uploaded)
                    .await;
                return Err(e);
            }
        };

        superseded.retain(|old| !uploaded.contains(old));
        self.discard(&run, LifecycleState::CleaningUp, &superseded)
            .await;

        run.enter(LifecycleState::Done);
        Ok(card)
    }

    /// Delete a card and both of its images.
    ///
    /// Image deletes are best-effort; the row delete runs regardless of their
    /// outcome. Deleting an unknown id is a no-op.
    pub async fn delete(&self, id: &CardId) -> Result<(), PromptdeckError> {
        let run = Run::new(Operation::Delete, Some(id));

        let Some(card) = self.records.get(id).await? else {
            debug!(card_id = %id, "delete of unknown card is a no-op");
            return Ok(());
        };

        self.discard(
            &run,
            LifecycleState::DeletingAssets,
            &[card.output_image_path, card.reference_image_path],
        )
        .await;

        run.enter(LifecycleState::DeletingRecord);
        self.records.delete(id).await?;

        run.enter(LifecycleState::Done);
        Ok(())
    }

    /// Set or clear the favorite flag. Touches no images.
    pub async fn set_favorite(
        &self,
        id: &CardId,
        is_favorited: bool,
    ) -> Result<Card, PromptdeckError> {
        self.records.set_favorite(id, is_favorited).await
    }

    /// Read URLs for every known card in `ids`.
    ///
    /// A path that cannot be signed yields `None` instead of failing the batch.
    pub async fn resolve_urls(
        &self,
        ids: &[CardId],
        ttl: Duration,
    ) -> Result<Vec<CardUrls>, PromptdeckError> {
        let cards = self.records.get_by_ids(ids).await?;
        let resolved = join_all(cards.iter().map(|card| async move {
            let (output, reference) = futures::join!(
                self.objects.read_url(&card.output_image_path, ttl),
                self.objects.read_url(&card.reference_image_path, ttl),
            );
            CardUrls {
                id: card.id.clone(),
                output_image_url: signed_or_none(&card.id, output),
                reference_image_url: signed_or_none(&card.id, reference),
            }
        }))
        .await;
        Ok(resolved)
    }
}

fn signed_or_none(id: &CardId, result: Result<String, PromptdeckError>) -> Option<String> {
    match result {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(card_id = %id, error = %e, "could not sign image URL");
            None
        }
    }
}
