// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Promptdeck integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a real bucket.
//!
//! # Components
//!
//! - [`MockObjectStore`] - In-memory bucket with per-folder and per-path failure injection
//! - [`MockAuthProvider`] - Auth provider with scripted authorization codes
//! - [`FaultyRecordStore`] - Record store wrapper that fails writes on demand
//! - [`TestHarness`] - Temp SQLite store, mock bucket and a wired [`CardLifecycle`]
//!
//! [`CardLifecycle`]: promptdeck_lifecycle::CardLifecycle

pub mod faulty_records;
pub mod fixtures;
pub mod harness;
pub mod mock_auth;
pub mod mock_objects;

pub use faulty_records::FaultyRecordStore;
pub use harness::TestHarness;
pub use mock_auth::MockAuthProvider;
pub use mock_objects::{MockObjectStore, ObjectCall};
