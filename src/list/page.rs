//! Paginated list envelopes and their paging metadata.

use serde::{Deserialize, Serialize};

/// One page of a larger server-side collection.
///
/// The wire name for `items` is `docs`. Use [`PaginatedList::normalized`]
/// before trusting the metadata; the server's derived fields are recomputed
/// from `total_docs` and `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    #[serde(rename = "docs", alias = "items")]
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_docs: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_prev_page: bool,
}

impl<T> PaginatedList<T> {
    /// Build a page with consistent metadata.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_docs: u64) -> Self {
        Self {
            items,
            page,
            limit,
            total_docs,
            total_pages: 0,
            has_next_page: false,
            has_prev_page: false,
        }
        .normalized()
    }

    /// An empty first page.
    pub fn empty(limit: u32) -> Self {
        Self::new(Vec::new(), 1, limit, 0)
    }

    /// Recompute derived fields so the paging invariants hold:
    /// `total_pages = ceil(total_docs / limit)`, `page` within
    /// `[1, total_pages]` when there are documents, and the next/prev flags
    /// derived from `page`.
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.max(1);
        let pages = self.total_docs.div_ceil(u64::from(self.limit));
        self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        self.page = if self.total_pages == 0 {
            1
        } else {
            self.page.clamp(1, self.total_pages)
        };

        self.has_next_page = self.page < self.total_pages;
        self.has_prev_page = self.page > 1;
        self
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total_docs: self.total_docs,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_docs: self.total_docs,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}

/// Paging metadata of the page currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_docs: u64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}
