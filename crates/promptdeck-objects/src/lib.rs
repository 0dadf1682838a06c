// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image bucket for the Promptdeck card gallery.
//!
//! Objects live under folder namespaces (`Output/`, `Reference/`) with
//! generated names that never collide, and are only ever read through
//! time-limited HMAC-signed URLs.

pub mod naming;
pub mod signing;
pub mod store;

pub use signing::UrlSigner;
pub use store::LocalObjectStore;
