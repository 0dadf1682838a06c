// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication boundary for Promptdeck.
//!
//! Exchanges magic-link authorization codes with the hosted provider, gates
//! sign-ins on the organisational email domain and keeps the resulting
//! sessions in an explicit registry passed to whoever needs it.

pub mod callback;
pub mod domain;
pub mod provider;
pub mod session;

pub use callback::{AuthService, CallbackError};
pub use domain::DomainPolicy;
pub use provider::HttpAuthProvider;
pub use session::SessionRegistry;
