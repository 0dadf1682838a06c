// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Promptdeck services.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque card identifier assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        CardId(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        CardId(value)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    RecordStore,
    ObjectStore,
    Auth,
}

/// Folder namespace inside the object bucket.
///
/// Every stored object path starts with the folder name, e.g. `Output/1718000000000-k3j2h1.png`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ImageFolder {
    Output,
    Reference,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Output => "Output",
            ImageFolder::Reference => "Reference",
        }
    }

    /// Multipart form field carrying the image for this folder.
    pub fn form_field(&self) -> &'static str {
        match self {
            ImageFolder::Output => "output_image",
            ImageFolder::Reference => "reference_image",
        }
    }

    /// Resolve the folder an object path lives in.
    pub fn of_path(path: &str) -> Option<ImageFolder> {
        let (folder, _) = path.split_once('/')?;
        folder.parse().ok()
    }
}

/// A user-supplied image file, as declared by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name (used only for its extension).
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One catalogued generation sample: metadata plus an output and a reference image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub output_image_path: String,
    pub reference_image_path: String,
    pub prompt: String,
    pub metadata: String,
    pub client: String,
    pub model: String,
    pub seed: String,
    #[serde(default)]
    pub llm_used: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields of a card about to be inserted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewCard {
    pub output_image_path: String,
    pub reference_image_path: String,
    pub prompt: String,
    pub metadata: String,
    pub client: String,
    pub model: String,
    pub seed: String,
    #[serde(default)]
    pub llm_used: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_favorited: bool,
}

impl NewCard {
    /// Names of required text fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("output_image_path", &self.output_image_path),
            ("reference_image_path", &self.reference_image_path),
            ("prompt", &self.prompt),
            ("metadata", &self.metadata),
            ("client", &self.client),
            ("model", &self.model),
            ("seed", &self.seed),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Partial update of a card. `None` leaves a column untouched.
///
/// For the optional columns (`llm_used`, `notes`) an empty string clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorited: Option<bool>,
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        *self == CardPatch::default()
    }

    /// Required text fields the patch would set to blank.
    pub fn blanked_required_fields(&self) -> Vec<&'static str> {
        [
            ("output_image_path", &self.output_image_path),
            ("reference_image_path", &self.reference_image_path),
            ("prompt", &self.prompt),
            ("metadata", &self.metadata),
            ("client", &self.client),
            ("model", &self.model),
            ("seed", &self.seed),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Distinct filter values present in the table, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub clients: Vec<String>,
    pub models: Vec<String>,
}

/// Resolved read URLs for one card. `None` when signing failed for that image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUrls {
    pub id: CardId,
    pub output_image_url: Option<String>,
    pub reference_image_url: Option<String>,
}

/// An authenticated session returned by the auth boundary.
///
/// Passed explicitly between the callback handler, the session registry and
/// the middleware; there is no ambient session state.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Action a confirmation guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmAction {
    DeleteCard,
}

/// A declarative request for the user to confirm a destructive action.
///
/// Rendering is up to the client; the action proceeds only when the
/// request is answered with `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub action: ConfirmAction,
    pub card_id: CardId,
    pub title: String,
    pub message: String,
}

impl ConfirmationRequest {
    pub fn delete_card(card: &Card) -> Self {
        let preview: String = card.prompt.chars().take(60).collect();
        let ellipsis = if card.prompt.chars().count() > 60 { "..." } else { "" };
        Self {
            action: ConfirmAction::DeleteCard,
            card_id: card.id.clone(),
            title: "Delete card".to_string(),
            message: format!(
                "Delete \"{preview}{ellipsis}\" and both of its images? This cannot be undone."
            ),
        }
    }

    /// Resolve the request with the user's answer.
    pub fn resolve(&self, confirmed: bool) -> Option<ConfirmAction> {
        confirmed.then_some(self.action)
    }
}
