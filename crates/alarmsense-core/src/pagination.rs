// ── Pagination ──

use std::ops::Range;

use crate::error::CoreError;

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages for `len` items; never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// The 1-based `page` of `items`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    items.get(page_range(items.len(), page, page_size)).unwrap_or(&[])
}

fn page_range(len: usize, page: usize, page_size: usize) -> Range<usize> {
    if page == 0 || page_size == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// Current page over a result set of known size.
///
/// The page is always within `1..=total_pages()`. Changing the page size
/// or the underlying set goes back to page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Result<Self, CoreError> {
        let mut pager = Self::default();
        pager.set_page_size(page_size)?;
        Ok(pager)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    /// Must be one of [`PAGE_SIZE_OPTIONS`]. Resets to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), CoreError> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(CoreError::InvalidPageSize { size: page_size });
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Step to the next page size option, wrapping around. Resets to page 1.
    pub fn cycle_page_size(&mut self) {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|s| *s == self.page_size)
            .map_or(0, |i| (i + 1) % PAGE_SIZE_OPTIONS.len());
        self.page_size = PAGE_SIZE_OPTIONS.get(idx).copied().unwrap_or(DEFAULT_PAGE_SIZE);
        self.page = 1;
    }

    /// The underlying set changed. Resets to page 1.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = 1;
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn first(&mut self) {
        self.page = 1;
    }

    pub fn prev(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    pub fn last(&mut self) {
        self.page = self.total_pages();
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Items of the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }

    /// 1-based first and last record numbers on this page.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let range = page_range(self.total, self.page, self.page_size);
        (!range.is_empty()).then_some((range.start + 1, range.end))
    }

    /// Footer text: `SHOWING 11 - 20 OF 45`, or `0 results`.
    pub fn label(&self) -> String {
        match self.bounds() {
            Some((from, to)) => format!("SHOWING {from} - {to} OF {}", self.total),
            None => "0 results".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pages_cover_set_exactly_once_in_order() {
        for len in [0_usize, 1, 4, 5, 6, 10, 24, 25, 26, 45] {
            let items: Vec<usize> = (0..len).collect();
            for size in PAGE_SIZE_OPTIONS {
                let mut joined = Vec::new();
                for page in 1..=total_pages(len, size) {
                    joined.extend_from_slice(paginate(&items, page, size));
                }
                assert_eq!(joined, items, "len={len} size={size}");
            }
        }
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(45, 25), 2);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 5).is_empty());
        assert!(paginate(&items, 2, 5).is_empty());
        assert!(paginate(&items, usize::MAX, 5).is_empty());
    }

    #[test]
    fn navigation_is_clamped() {
        let mut pager = Pager::default();
        pager.set_total(45);
        assert!(!pager.has_prev());
        assert!(pager.has_next());
        pager.prev();
        assert_eq!(pager.page(), 1);
        pager.last();
        assert_eq!(pager.page(), 5);
        assert!(pager.has_prev());
        assert!(!pager.has_next());
        pager.next();
        assert_eq!(pager.page(), 5);
        pager.go_to(99);
        assert_eq!(pager.page(), 5);
        pager.go_to(0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn page_size_and_total_changes_reset_page() {
        let mut pager = Pager::default();
        pager.set_total(45);
        pager.go_to(3);
        pager.set_page_size(25).unwrap();
        assert_eq!(pager.page(), 1);
        pager.go_to(2);
        pager.set_total(7);
        assert_eq!(pager.page(), 1);
        pager.go_to(2);
        pager.cycle_page_size();
        assert_eq!(pager.page_size(), 5);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn rejects_unknown_page_size() {
        assert!(matches!(
            Pager::new(7),
            Err(CoreError::InvalidPageSize { size: 7 })
        ));
    }

    #[test]
    fn footer_labels() {
        let mut pager = Pager::default();
        assert_eq!(pager.label(), "0 results");
        pager.set_total(45);
        pager.go_to(2);
        assert_eq!(pager.label(), "SHOWING 11 - 20 OF 45");
        pager.last();
        assert_eq!(pager.label(), "SHOWING 41 - 45 OF 45");
    }
}
