// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Promptdeck card gallery.

use thiserror::Error;

use crate::types::{CardId, ImageFolder};

/// Reasons a file is rejected before any upload is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileValidationError {
    /// Declared MIME type is not on the image allow-list.
    #[error("unsupported file type `{content_type}`: upload PNG, JPG, GIF, or WebP files only")]
    UnsupportedType { content_type: String },

    /// File is larger than the configured ceiling.
    #[error("file size must be less than {max_size_mb}MB (got {size} bytes)")]
    TooLarge { size: u64, max_size_mb: u64 },

    /// File has no content.
    #[error("file appears to be empty")]
    Empty,
}

/// The primary error type used across all Promptdeck adapter traits and core operations.
///
/// Forward-path failures (validation, upload, record writes) are surfaced to
/// callers. Compensation failures are built as [`PromptdeckError::ObjectDelete`]
/// and only ever logged.
#[derive(Debug, Error)]
pub enum PromptdeckError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A submitted image failed validation.
    #[error("{folder} image: {source}")]
    Validation {
        folder: ImageFolder,
        #[source]
        source: FileValidationError,
    },

    /// The object store rejected an upload.
    #[error("failed to upload {folder} image: {message}")]
    UploadFailed {
        folder: ImageFolder,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The record store rejected an insert.
    #[error("failed to create card: {message}")]
    InsertFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The record store rejected an update.
    #[error("failed to update card {id}: {message}")]
    UpdateFailed {
        id: CardId,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The record store rejected a delete.
    #[error("failed to delete card {id}: {message}")]
    DeleteFailed {
        id: CardId,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No card exists with the given id.
    #[error("card not found: {id}")]
    NotFound { id: CardId },

    /// Removing an object from the store failed.
    #[error("failed to delete object `{path}`: {message}")]
    ObjectDelete { path: String, message: String },

    /// A read URL could not be issued for the path.
    #[error("failed to sign URL for `{path}`: {message}")]
    SignError { path: String, message: String },

    /// A signed read URL was dereferenced after its expiry.
    #[error("signed URL for `{path}` has expired")]
    UrlExpired { path: String },

    /// A signed read URL carried a signature that does not match its path.
    #[error("signed URL for `{path}` has an invalid signature")]
    InvalidSignature { path: String },

    /// The signed-in email does not belong to the organisational domain.
    #[error("email `{email}` is not in an allowed domain")]
    AuthDomainRejected { email: String },

    /// Authentication provider failure (code exchange, sign-out).
    #[error("authentication error: {message}")]
    Auth {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A list or lookup request was malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PromptdeckError {
    /// Wrap any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PromptdeckError::Storage {
            source: Box::new(err),
        }
    }

    /// True when the error was caused by caller input rather than a backend.
    ///
    /// A write failure without a backend source was rejected before reaching
    /// the store, because a required field was blank.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PromptdeckError::Validation { .. }
                | PromptdeckError::InsertFailed { source: None, .. }
                | PromptdeckError::UpdateFailed { source: None, .. }
                | PromptdeckError::NotFound { .. }
                | PromptdeckError::InvalidQuery(_)
                | PromptdeckError::UrlExpired { .. }
                | PromptdeckError::InvalidSignature { .. }
                | PromptdeckError::AuthDomainRejected { .. }
        )
    }
}
