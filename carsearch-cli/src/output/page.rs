//! Result pagination.

/// Default rows per page.
pub const DEFAULT_PER_PAGE: usize = 10;

/// A zero-based page window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: usize,
    /// Rows per page, at least one.
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PER_PAGE)
    }
}

impl Pagination {
    /// Creates a window; `per_page` is clamped to at least one.
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    fn start(&self) -> usize {
        self.page.saturating_mul(self.per_page)
    }

    /// Returns the rows on this page. Empty past the last page.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.start().min(rows.len());
        let end = start.saturating_add(self.per_page).min(rows.len());
        &rows[start..end]
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page)
    }

    /// Footer label such as `11–20 of 42`.
    pub fn range_label(&self, total: usize) -> String {
        let start = self.start();
        if start >= total {
            return format!("0–0 of {total}");
        }
        let end = start.saturating_add(self.per_page).min(total);
        format!("{}–{} of {}", start + 1, end, total)
    }
}
