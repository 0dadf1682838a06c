// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Promptdeck card gallery.
//!
//! Serves the card API under `/v1`, signed image reads under `/objects`
//! and the magic-link callback under `/auth`.

pub mod auth;
pub mod error;
pub mod form;
pub mod handlers;
pub mod objects;
pub mod server;

pub use auth::ApiAuth;
pub use error::{ApiError, ErrorResponse};
pub use form::CardForm;
pub use server::{GalleryLimits, GatewayState, router, start_server};
