// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types and backend traits for the promptdeck card gallery.
//!
//! Cards, uploads and list queries live here, along with the three seams the
//! rest of the workspace plugs into: the card table, the image bucket and the
//! sign-in provider.

pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use error::{FileValidationError, PromptdeckError};
pub use query::{ListQuery, PaginatedResult, SortOrder};
pub use types::{
    AdapterType, AuthSession, Card, CardId, CardPatch, CardUrls, ConfirmAction,
    ConfirmationRequest, FilterOptions, HealthStatus, ImageFolder, ImageUpload, NewCard,
};

pub use traits::{AuthAdapter, ObjectStoreAdapter, PluginAdapter, RecordStoreAdapter};
