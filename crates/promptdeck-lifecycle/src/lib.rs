// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Card lifecycle for Promptdeck.
//!
//! Validates image uploads and sequences every card mutation across the
//! object store and the record store, compensating for partial failures so
//! neither store is left pointing at something the other does not have.

pub mod draft;
pub mod orchestrator;
pub mod state;
pub mod validator;

pub use draft::{CardDraft, CardEdit};
pub use orchestrator::{CardLifecycle, DEFAULT_URL_TTL};
pub use state::{LifecycleState, Operation};
pub use validator::{ALLOWED_CONTENT_TYPES, DEFAULT_MAX_SIZE_MB, FileValidator};
