//! Page normalization for the paged car listing.

/// Page size used when the requested one is out of range.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized, 1-indexed page request.
///
/// Out-of-range input is clamped silently rather than rejected: a page
/// below 1 becomes 1 and a page size outside `1..=100` becomes 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u32,
}

impl PageRequest {
    /// Normalizes raw client values into a page request.
    #[must_use]
    pub fn normalized(page: i64, page_size: i64) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let page_size = u32::try_from(page_size)
            .ok()
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Number of records per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records to skip: `(page - 1) * page_size`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
