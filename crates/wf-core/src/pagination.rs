//! Page-window primitives.
//!
//! A page window is a `(page, limit)` pair taken from the query string and
//! converted to a `(offset, limit)` range. Missing or non-numeric input
//! degrades to the defaults rather than erroring.

/// Default page number when absent or unparseable
pub const DEFAULT_PAGE: i64 = 1;
/// Default page size when absent or unparseable
pub const DEFAULT_LIMIT: i64 = 100;

/// A (page, limit) pair, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Create a window, coercing non-positive values to the defaults
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: if page > 0 { page } else { DEFAULT_PAGE },
            limit: if limit > 0 { limit } else { DEFAULT_LIMIT },
        }
    }

    /// Lenient parse from raw query-string values. Anything that is not a
    /// positive integer falls back to the default.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    /// Number of rows to skip. Saturates instead of overflowing when a
    /// huge page number slips through the positivity check.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let window = PageWindow::default();
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 100);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_offset_computation() {
        let window = PageWindow::new(2, 10);
        assert_eq!(window.offset(), 10);
        assert_eq!(window.limit, 10);

        let window = PageWindow::new(3, 25);
        assert_eq!(window.offset(), 50);
    }

    #[test]
    fn test_from_raw_degrades_to_defaults() {
        assert_eq!(PageWindow::from_raw(None, None), PageWindow::default());
        assert_eq!(
            PageWindow::from_raw(Some("abc"), Some("ten")),
            PageWindow::default()
        );
        assert_eq!(
            PageWindow::from_raw(Some("-3"), Some("0")),
            PageWindow::default()
        );
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let window = PageWindow::from_raw(Some("9223372036854775807"), Some("100"));
        assert_eq!(window.page, i64::MAX);
        assert_eq!(window.offset(), i64::MAX);

        let window = PageWindow::new(i64::MAX, i64::MAX);
        assert_eq!(window.offset(), i64::MAX);
    }

    #[test]
    fn test_from_raw_parses_numbers() {
        let window = PageWindow::from_raw(Some("4"), Some("20"));
        assert_eq!(window.page, 4);
        assert_eq!(window.limit, 20);
        assert_eq!(window.offset(), 60);
    }
}
