/// Default page size when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pagination query parameters (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Clamp page to >= 1 and limit to `[1, max_limit]`.
    pub fn clamped(self, max_limit: u32) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Zero-based page index.
    pub fn index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }

    pub fn offset(&self) -> u64 {
        self.index() * u64::from(self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, serde::Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_and_limit() {
        let p = PaginationParams::new(0, 500).clamped(100);
        assert_eq!(p, PaginationParams::new(1, 100));

        let p = PaginationParams::new(3, 0).clamped(100);
        assert_eq!(p.limit, 1);
        assert_eq!(p.offset(), 2);
    }

    #[test]
    fn total_pages_rounds_up() {
        let r: PaginatedResult<u8> = PaginatedResult::new(vec![], 41, 1, 20);
        assert_eq!(r.total_pages, 3);

        let empty: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}
