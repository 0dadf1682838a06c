// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export of selected prompt cards as JSON, CSV or clipboard text.

pub mod formats;
pub mod text;

pub use formats::{
    CSV_HEADER, ExportFormat, export, export_csv, export_file_name, export_json,
};
pub use text::{format_card, format_cards};
