//! Pagination window math.
//!
//! Every paged admin listing (users, referrals, messages, mutes) shares the
//! same window rules: fixed page size, zero-based page index, total-page
//! count rounded up. Navigation affordances derive from the index and the
//! total, so the "next" affordance is absent on the last page.

/// Rows per page in admin listings.
pub const PAGE_SIZE: i64 = 5;

/// One window of a paged listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in this window
    pub items: Vec<T>,
    /// Zero-based page index
    pub page: i64,
    /// Total number of pages for the full result set
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Assemble a page from a fetched window and the total row count.
    pub fn new(items: Vec<T>, page: i64, total_rows: i64, page_size: i64) -> Self {
        Self {
            items,
            page,
            total_pages: total_pages(total_rows, page_size),
        }
    }

    /// True when an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// True when a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages - 1
    }

    /// Map the window items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

/// Total page count for `total_rows` rows at `page_size` rows per page.
pub fn total_pages(total_rows: i64, page_size: i64) -> i64 {
    if total_rows <= 0 {
        return 0;
    }
    (total_rows + page_size - 1) / page_size
}

/// SQL-style `(limit, offset)` for a zero-based page index.
pub fn page_window(page: i64, page_size: i64) -> (i64, i64) {
    (page_size, page.max(0) * page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_rows_make_three_pages() {
        assert_eq!(total_pages(12, PAGE_SIZE), 3);
        assert_eq!(total_pages(10, PAGE_SIZE), 2);
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
    }

    #[test]
    fn window_offsets_advance_by_page_size() {
        assert_eq!(page_window(0, PAGE_SIZE), (5, 0));
        assert_eq!(page_window(2, PAGE_SIZE), (5, 10));
        assert_eq!(page_window(-1, PAGE_SIZE), (5, 0));
    }

    #[test]
    fn last_page_has_no_next_affordance() {
        let first: Page<i64> = Page::new(vec![1, 2, 3, 4, 5], 0, 12, PAGE_SIZE);
        assert!(first.has_next());
        assert!(!first.has_prev());

        let last: Page<i64> = Page::new(vec![11, 12], 2, 12, PAGE_SIZE);
        assert_eq!(last.items.len(), 2);
        assert!(!last.has_next());
        assert!(last.has_prev());
    }
}
