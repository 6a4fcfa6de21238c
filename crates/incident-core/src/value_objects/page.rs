//! Page-number pagination shared by list and timeline queries

use serde::Serialize;

use crate::error::DomainError;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Maximum page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated page request (1-indexed page, bounded limit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request
    ///
    /// Pages start at 1. The limit is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, limit: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::ValidationError(
                "page must be 1 or greater".to_string(),
            ));
        }

        Ok(Self {
            page,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        })
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip
    #[inline]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Select this page out of an already ordered slice
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

/// One page of results plus the total item count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    /// Empty page for a request past the end (or with no data at all)
    pub fn empty(total: u64, request: PageRequest) -> Self {
        Self::new(Vec::new(), total, request)
    }

    /// Convert the items, keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_zero_rejected() {
        let err = PageRequest::new(0, 10).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(PageRequest::new(1, 500).unwrap().limit(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 0).unwrap().limit(), 1);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 25).unwrap();
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items = vec!["only"];
        let request = PageRequest::new(2, 1).unwrap();
        assert!(request.slice(&items).is_empty());

        let request = PageRequest::new(1, 1).unwrap();
        assert_eq!(request.slice(&items), &["only"]);
    }

    #[test]
    fn test_slice_partial_last_page() {
        let items: Vec<u32> = (1..=5).collect();
        let request = PageRequest::new(2, 3).unwrap();
        assert_eq!(request.slice(&items), &[4, 5]);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 10, PageRequest::new(2, 2).unwrap());
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.total, 10);
        assert_eq!(mapped.page, 2);
    }
}
