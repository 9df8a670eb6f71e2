//! Fixed-size pagination over a filtered, sorted sequence.
//!
//! [`paginate`] performs no clamping: an out-of-range page yields an empty
//! slice. Callers reset to page 1 with [`clamp_page`] whenever a filter
//! change shrinks the page count below the current page.

use serde::Serialize;

/// Navigation state for one page. Indices are 0-based, `end_index` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// The items of this page, or an empty slice when out of range.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.start_index..self.end_index).unwrap_or(&[])
    }
}

/// Compute page boundaries for a 1-based `current_page`.
///
/// A `page_size` of zero yields zero pages.
pub fn paginate(total_items: usize, current_page: usize, page_size: usize) -> Pagination {
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };
    let start_index = current_page.saturating_sub(1).saturating_mul(page_size);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    Pagination {
        total_pages,
        start_index,
        end_index,
        has_next: current_page < total_pages,
        has_prev: current_page > 1,
    }
}

/// Reset `current_page` to 1 when it falls outside `[1, total_pages]`.
pub fn clamp_page(current_page: usize, total_pages: usize) -> usize {
    if current_page < 1 || current_page > total_pages {
        1
    } else {
        current_page
    }
}
