//! Pagination utilities for service layer
//!
//! Offset/limit paging over 1-based page numbers plus the page-count rule used by
//! every guide listing.

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validated paging parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub page_size: u64,
}

impl PageRequest {
    /// Reject `page < 1` and page sizes outside `1..=100`.
    pub fn new(page: u64, page_size: u64) -> Result<Self, ServiceError> {
        if page < 1 {
            return Err(ServiceError::Validation("page must be >= 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ServiceError::Validation(format!("page_size must be within 1..={MAX_PAGE_SIZE}")));
        }
        Ok(Self { page, page_size })
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 1, page_size: DEFAULT_PAGE_SIZE } }
}

/// Number of pages needed for `total` rows: a partial last page counts as a page.
pub fn page_count(total: u64, page_size: u64) -> u64 {
    let (quotient, remainder) = (total / page_size, total % page_size);
    if remainder > 0 { quotient + 1 } else { quotient }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_partial_pages_up() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(10, 5), 2);
        assert_eq!(page_count(11, 5), 3);
        assert_eq!(page_count(1, 100), 1);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 20).unwrap().offset(), 40);
    }

    #[test]
    fn bounds_are_enforced() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn default_values_are_sane() {
        let d = PageRequest::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.page_size, 50);
    }
}
