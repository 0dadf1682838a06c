// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-upload file checks.

use promptdeck_core::{FileValidationError, ImageUpload};

/// MIME types accepted for either image of a card.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// Default size ceiling in MiB.
pub const DEFAULT_MAX_SIZE_MB: u64 = 50;

const BYTES_PER_MB: u64 = 1_048_576;

/// Rejects files by declared type, size ceiling and emptiness, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileValidator {
    max_size_mb: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE_MB)
    }
}

impl FileValidator {
    pub fn new(max_size_mb: u64) -> Self {
        Self { max_size_mb }
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn validate(&self, file: &ImageUpload) -> Result<(), FileValidationError> {
        let content_type = file.content_type.trim().to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(FileValidationError::UnsupportedType {
                content_type: file.content_type.clone(),
            });
        }
        let size = file.size();
        if size > self.max_size_bytes() {
            return Err(FileValidationError::TooLarge {
                size,
                max_size_mb: self.max_size_mb,
            });
        }
        if size == 0 {
            return Err(FileValidationError::Empty);
        }
        Ok(())
    }
}
