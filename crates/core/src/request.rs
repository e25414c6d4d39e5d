//! Page requests and page geometry
//!
//! A [`PageRequest`] is the single entry shape for running a named query:
//! which query, which terms, and which window of the result to return.
//! [`PageSpec`] is the validated form of the window, with the sentinel page
//! size already resolved.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::QueryError;
use crate::term::ValueTerm;

/// Request to run a named query and return one page of its result.
///
/// Terms are held as a set, so duplicates collapse and the order they were
/// supplied in is forgotten at the boundary. `page_size` is a signed count
/// with one sentinel: [`PageRequest::UNPAGED`] asks for the entire result as
/// a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Name of the registered query to run.
    pub query_name: String,
    /// Terms constraining the query, in canonical order.
    pub terms: BTreeSet<ValueTerm>,
    /// Zero-based page number. Ignored when `page_size` is [`PageRequest::UNPAGED`].
    pub page_number: u32,
    /// Rows per page, or [`PageRequest::UNPAGED`] for the whole result.
    pub page_size: i32,
}

impl PageRequest {
    /// Sentinel page size requesting the entire result as one page.
    pub const UNPAGED: i32 = -1;

    /// Create a request for one page of a named query's result.
    pub fn new(
        query_name: impl Into<String>,
        terms: BTreeSet<ValueTerm>,
        page_number: u32,
        page_size: i32,
    ) -> Self {
        PageRequest {
            query_name: query_name.into(),
            terms,
            page_number,
            page_size,
        }
    }

    /// Create a request for the entire result of a named query.
    pub fn unpaged(query_name: impl Into<String>, terms: BTreeSet<ValueTerm>) -> Self {
        PageRequest::new(query_name, terms, 0, PageRequest::UNPAGED)
    }

    /// Resolve the page geometry, rejecting sizes that are neither positive
    /// nor the unpaged sentinel.
    pub fn page_spec(&self) -> Result<PageSpec, QueryError> {
        PageSpec::resolve(self.page_number, self.page_size)
    }
}

/// Validated page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSpec {
    /// The entire result as a single page.
    All,
    /// A fixed window: page `number` of `size` rows each.
    Fixed {
        /// Zero-based page number.
        number: u32,
        /// Rows per page, always positive.
        size: usize,
    },
}

impl PageSpec {
    /// Resolve raw page geometry, rejecting sizes that are neither positive
    /// nor the unpaged sentinel.
    pub fn resolve(page_number: u32, page_size: i32) -> Result<PageSpec, QueryError> {
        match page_size {
            PageRequest::UNPAGED => Ok(PageSpec::All),
            size if size > 0 => Ok(PageSpec::Fixed {
                number: page_number,
                size: size as usize,
            }),
            other => Err(QueryError::InvalidPageSize { page_size: other }),
        }
    }

    /// Rows skipped before this page starts.
    pub fn offset(&self) -> usize {
        match self {
            PageSpec::All => 0,
            PageSpec::Fixed { number, size } => (*number as usize) * size,
        }
    }

    /// Row cap for this page, if any.
    pub fn limit(&self) -> Option<usize> {
        match self {
            PageSpec::All => None,
            PageSpec::Fixed { size, .. } => Some(*size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{term_set, ValueTerm};

    fn request_with_size(page_number: u32, page_size: i32) -> PageRequest {
        PageRequest::new(
            "FindRulesByProjectQuery",
            term_set([ValueTerm::package_name("org.acme")]),
            page_number,
            page_size,
        )
    }

    #[test]
    fn test_unpaged_sentinel_resolves_to_all() {
        let request = PageRequest::unpaged("FindRulesByProjectQuery", BTreeSet::new());
        assert_eq!(request.page_size, PageRequest::UNPAGED);
        assert_eq!(request.page_spec().unwrap(), PageSpec::All);
    }

    #[test]
    fn test_unpaged_ignores_page_number() {
        let request = request_with_size(7, PageRequest::UNPAGED);
        assert_eq!(request.page_spec().unwrap(), PageSpec::All);
        assert_eq!(request.page_spec().unwrap().offset(), 0);
        assert_eq!(request.page_spec().unwrap().limit(), None);
    }

    #[test]
    fn test_fixed_window_offset_and_limit() {
        let spec = request_with_size(3, 10).page_spec().unwrap();
        assert_eq!(spec, PageSpec::Fixed { number: 3, size: 10 });
        assert_eq!(spec.offset(), 30);
        assert_eq!(spec.limit(), Some(10));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = request_with_size(0, 0).page_spec().unwrap_err();
        assert_eq!(err, QueryError::InvalidPageSize { page_size: 0 });
    }

    #[test]
    fn test_negative_page_size_other_than_sentinel_rejected() {
        let err = request_with_size(0, -2).page_spec().unwrap_err();
        assert_eq!(err, QueryError::InvalidPageSize { page_size: -2 });
    }

    #[test]
    fn test_request_serialization() {
        let request = request_with_size(1, 25);
        let json = serde_json::to_string(&request).unwrap();
        let restored: PageRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, restored);
    }
}
