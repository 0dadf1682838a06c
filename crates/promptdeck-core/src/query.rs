// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List queries and pagination arithmetic.
//!
//! A [`ListQuery`] is an ephemeral value built fresh for every request; the
//! record store translates it into its own query language.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::PromptdeckError;
use crate::types::Card;

/// Default number of cards per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Creation-time ordering of a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Filter, sort and page window for a card listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub client: Option<String>,
    pub model: Option<String>,
    pub favorites_only: bool,
    pub sort_by: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            client: None,
            model: None,
            favorites_only: false,
            sort_by: SortOrder::Newest,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    pub fn sort_by(mut self, sort_by: SortOrder) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Reject non-positive page numbers and sizes.
    pub fn validate(&self) -> Result<(), PromptdeckError> {
        if self.page == 0 {
            return Err(PromptdeckError::InvalidQuery(
                "page must be a positive integer".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(PromptdeckError::InvalidQuery(
                "page_size must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    /// Row offset of the first card on the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Normalise a filter value: blank and the `all` sentinel mean "no filter".
pub fn filter_value(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// Number of pages needed for `total_count` items.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of a filtered listing plus counts over the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult {
    pub cards: Vec<Card>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginatedResult {
    pub fn new(cards: Vec<Card>, total_count: u64, page: u32, page_size: u32) -> Self {
        let total_pages = total_pages(total_count, page_size);
        Self {
            cards,
            total_count,
            total_pages,
            current_page: page,
            page_size,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Page to show after a card was removed from `current_page`.
///
/// `cards_on_page` and `total_count` are the counts *before* the removal.
/// An emptied page falls back to the previous one; a page beyond the new
/// last page falls back to the last page.
pub fn page_after_removal(
    current_page: u32,
    cards_on_page: u32,
    total_count: u64,
    page_size: u32,
) -> u32 {
    let remaining_on_page = cards_on_page.saturating_sub(1);
    let pages = total_pages(total_count.saturating_sub(1), page_size);

    if remaining_on_page == 0 && current_page > 1 {
        current_page - 1
    } else if current_page > pages && pages > 0 {
        pages
    } else {
        current_page.max(1)
    }
}
