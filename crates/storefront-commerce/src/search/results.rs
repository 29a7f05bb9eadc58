//! Query results and pagination.

use serde::{Deserialize, Serialize};

/// Pages shown around the current one in a pager.
pub const MAX_PAGES_TO_SHOW: usize = 5;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub limit: usize,
    /// Total number of matching items.
    pub total_items: usize,
    /// Total number of pages, 0 when nothing matched.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info. `page` is clamped to `1..=max(total_pages, 1)`.
    pub fn new(page: usize, limit: usize, total_items: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = total_items.div_ceil(limit);
        let page = page.clamp(1, total_pages.max(1));

        Self {
            page,
            limit,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// Get page numbers for display (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }
        if max_visible == 0 {
            return Vec::new();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    /// Get start item number (1-indexed), 0 when empty.
    pub fn start_item(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        (self.page * self.limit).min(self.total_items)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, crate::search::DEFAULT_PAGE_SIZE, 0)
    }
}

/// One page of a catalog query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    /// The items on this page, in result order.
    pub items: Vec<T>,
    /// Matches before pagination.
    pub total_items: usize,
    pub total_pages: usize,
    /// Effective (clamped) page.
    pub page: usize,
    pub limit: usize,
}

impl<T> QueryResult<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            total_items: pagination.total_items,
            total_pages: pagination.total_pages,
            page: pagination.page,
            limit: pagination.limit,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit, self.total_items)
    }

    pub fn has_next(&self) -> bool {
        self.pagination().has_next
    }

    pub fn has_prev(&self) -> bool {
        self.pagination().has_prev
    }

    pub fn start_item(&self) -> usize {
        self.pagination().start_item()
    }

    pub fn end_item(&self) -> usize {
        self.pagination().end_item()
    }

    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        self.pagination().page_numbers(max_visible)
    }

    /// Check if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Convert the items, keeping the pagination.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryResult<U> {
        QueryResult {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn test_pagination_empty_has_zero_pages() {
        let p = Pagination::new(3, 12, 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.page, 1);
        assert!(!p.has_next);
        assert!(!p.has_prev);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
        assert!(p.page_numbers(MAX_PAGES_TO_SHOW).is_empty());
    }

    #[test]
    fn test_pagination_clamps_page() {
        assert_eq!(Pagination::new(99, 10, 45).page, 5);
        assert_eq!(Pagination::new(0, 10, 45).page, 1);
    }

    #[test]
    fn test_pagination_page_numbers() {
        let p = Pagination::new(5, 10, 100);
        assert_eq!(p.page_numbers(5), vec![3, 4, 5, 6, 7]);

        let p = Pagination::new(1, 10, 100);
        assert_eq!(p.page_numbers(5), vec![1, 2, 3, 4, 5]);

        let p = Pagination::new(10, 10, 100);
        assert_eq!(p.page_numbers(5), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_pagination_item_range() {
        let p = Pagination::new(5, 10, 45);
        assert_eq!(p.start_item(), 41);
        assert_eq!(p.end_item(), 45);
    }

    #[test]
    fn test_query_result_map_keeps_pagination() {
        let result = QueryResult::new(vec![1, 2, 3], Pagination::new(1, 3, 7));
        let mapped = result.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.total_pages, 3);
        assert!(mapped.has_next());
    }
}
