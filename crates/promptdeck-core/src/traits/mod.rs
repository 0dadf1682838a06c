// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend seams: the card table, the image bucket and the sign-in provider.
//!
//! Each is an `#[async_trait]` object-safe trait so the service can hold
//! them as `Arc<dyn ...>` and tests can swap in mocks.

pub mod adapter;
pub mod auth;
pub mod objects;
pub mod records;

pub use adapter::PluginAdapter;
pub use auth::AuthAdapter;
pub use objects::ObjectStoreAdapter;
pub use records::RecordStoreAdapter;
