//! Client-side pagination.

use std::ops::Range;

/// Current page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages for `total` rows (zero when empty).
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Keep the page index inside the list after it shrank.
    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.total_pages(total).saturating_sub(1));
    }

    /// Row range of the current page.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page + 1 < self.total_pages(total)
    }

    pub fn first(&mut self) {
        self.page = 0;
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn next(&mut self, total: usize) {
        if self.has_next(total) {
            self.page += 1;
        }
    }

    pub fn last(&mut self, total: usize) {
        self.page = self.total_pages(total).saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let pager = Pager::new(10);
        assert_eq!(pager.total_pages(0), 0);
        assert_eq!(pager.total_pages(10), 1);
        assert_eq!(pager.total_pages(11), 2);
    }

    #[test]
    fn test_range_and_navigation() {
        let mut pager = Pager::new(10);
        assert_eq!(pager.range(25), 0..10);

        pager.next(25);
        pager.next(25);
        assert_eq!(pager.range(25), 20..25);

        pager.next(25);
        assert_eq!(pager.page, 2);
        assert!(!pager.has_next(25));

        pager.prev();
        assert_eq!(pager.page, 1);
        pager.first();
        assert!(!pager.has_prev());
        pager.last(25);
        assert_eq!(pager.page, 2);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut pager = Pager::new(10);
        pager.last(50);
        pager.clamp(12);
        assert_eq!(pager.page, 1);

        pager.clamp(0);
        assert_eq!(pager.page, 0);
        assert_eq!(pager.range(0), 0..0);
    }

    #[test]
    fn test_zero_page_size_is_raised() {
        assert_eq!(Pager::new(0).page_size, 1);
    }
}
