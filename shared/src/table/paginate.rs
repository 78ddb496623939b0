// Client-side paging for list tables.
use serde::{Deserialize, Serialize};

/// Page sizes offered by the list pages.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Requested page. `page` is 0-based; `per_page == 0` shows everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page actually shown, after clamping.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 1-based positions of the first and last item shown, `None` when empty.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = self.page * self.per_page.max(1) + 1;
        Some((first, first + self.items.len() - 1))
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

/// Cuts one page out of `items`. A page past the end is clamped to the last
/// page.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total_items = items.len();
    if pagination.per_page == 0 {
        return Page {
            total_pages: usize::from(total_items > 0),
            items,
            page: 0,
            per_page: 0,
            total_items,
        };
    }

    let per_page = pagination.per_page;
    let total_pages = total_items.div_ceil(per_page);
    let page = pagination.page.min(total_pages.saturating_sub(1));
    let items = items
        .into_iter()
        .skip(page * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let page = paginate((1..=25).collect(), Pagination::new(1, 10));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.range(), Some((11, 20)));
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((1..=25).collect(), Pagination::new(2, 10));
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.range(), Some((21, 25)));
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let page = paginate((1..=12).collect(), Pagination::new(9, 5));
        assert_eq!(page.page, 2);
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<u8>::new(), Pagination::new(3, 10));
        assert_eq!(page.page, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.range(), None);
    }

    #[test]
    fn test_zero_per_page_shows_everything() {
        let page = paginate((1..=7).collect::<Vec<_>>(), Pagination::new(4, 0));
        assert_eq!(page.items.len(), 7);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.range(), Some((1, 7)));
    }
}
