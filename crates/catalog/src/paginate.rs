//! Fixed-size page windowing.

use core::ops::Range;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult};

/// Page size used by the storefront catalog grid.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Page state over an ordered sequence of `total_items` elements.
///
/// Pages are 1-based. Navigation outside `[1, total_pages]` is refused rather
/// than clamped or wrapped, so the current page never points past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaginatorRepr")]
pub struct Paginator {
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> DomainResult<Self> {
        if page_size == 0 {
            return Err(DomainError::validation("page size must be at least 1"));
        }
        Ok(Self {
            page: 1,
            page_size,
            total_items: 0,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// `ceil(total_items / page_size)`; zero for an empty sequence.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Update the item count, pulling the current page back into range if the
    /// sequence shrank.
    pub fn set_total(&mut self, total_items: usize) {
        self.total_items = total_items;
        let last = self.total_pages().max(1);
        if self.page > last {
            self.page = last;
        }
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Jump to `page` if it exists. Returns whether the page changed hands.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    /// Index range of the current page within the full sequence.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Current page slice of `items`.
    ///
    /// Bounds come from `items.len()` so a stale `total_items` can never index
    /// out of range.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

#[derive(Deserialize)]
struct PaginatorRepr {
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl TryFrom<PaginatorRepr> for Paginator {
    type Error = DomainError;

    fn try_from(repr: PaginatorRepr) -> Result<Self, Self::Error> {
        let mut pager = Paginator::new(repr.page_size)?;
        pager.page = repr.page.max(1);
        pager.set_total(repr.total_items);
        Ok(pager)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
        }
    }
}
