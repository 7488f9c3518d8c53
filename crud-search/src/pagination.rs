//! Pagination output
//!
//! Projects a [`SearchResult`] into the flat shape returned to callers:
//! `{ items, total, currentPage, perPage, lastPage }`. The items are passed
//! in separately so the caller decides how entities are rendered (for
//! example [`UserOutput`](crate::users::UserOutput) without exposing the
//! entity itself).
//!
//! # Example
//!
//! ```rust
//! use crud_search::pagination::PaginationOutput;
//! use crud_search::repository::{SearchInput, SearchParams, SearchResult};
//!
//! let params = SearchParams::new(SearchInput::new().with_per_page(2));
//! let result = SearchResult::new(vec![1, 2], 5, &params);
//!
//! let output = PaginationOutput::from_result(vec!["one", "two"], &result);
//! assert_eq!(output.total, 5);
//! assert_eq!(output.last_page, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::repository::SearchResult;

/// Flat pagination payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOutput<T> {
    /// Rendered items of the current page
    pub items: Vec<T>,
    /// Items matching the filter across all pages
    pub total: u64,
    /// Current page number (1-indexed)
    pub current_page: u64,
    /// Page size
    pub per_page: u64,
    /// `ceil(total / per_page)`
    pub last_page: u64,
}

impl<T> PaginationOutput<T> {
    /// Combine already-rendered `items` with the metadata of `result`
    ///
    /// Pure; calling it twice with the same arguments yields equal outputs.
    pub fn from_result<E>(items: Vec<T>, result: &SearchResult<E>) -> Self {
        Self {
            items,
            total: result.total(),
            current_page: result.current_page(),
            per_page: result.per_page(),
            last_page: result.last_page(),
        }
    }

    /// Render each item of `result` with `f`
    pub fn map_result<E, F>(result: &SearchResult<E>, f: F) -> Self
    where
        F: FnMut(&E) -> T,
    {
        Self::from_result(result.items().iter().map(f).collect(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{SearchInput, SearchParams};
    use serde_json::json;

    fn params(page: u64, per_page: u64) -> SearchParams {
        SearchParams::new(SearchInput::new().with_page(page).with_per_page(per_page))
    }

    #[test]
    fn test_from_result() {
        let result = SearchResult::new(vec!["c", "d"], 5, &params(2, 2));
        let output = PaginationOutput::from_result(vec!["C", "D"], &result);

        assert_eq!(
            output,
            PaginationOutput {
                items: vec!["C", "D"],
                total: 5,
                current_page: 2,
                per_page: 2,
                last_page: 3,
            }
        );
    }

    #[test]
    fn test_from_result_is_idempotent() {
        let result = SearchResult::<u8>::new(vec![], 1, &params(1, 1));

        let first = PaginationOutput::<u8>::from_result(vec![], &result);
        let second = PaginationOutput::<u8>::from_result(vec![], &result);

        assert_eq!(first, second);
        assert_eq!(first.total, 1);
        assert_eq!(first.last_page, 1);
        assert!(first.items.is_empty());
    }

    #[test]
    fn test_map_result() {
        let result = SearchResult::new(vec![1, 2, 3], 3, &params(1, 15));
        let output = PaginationOutput::map_result(&result, |n| n * 2);

        assert_eq!(output.items, vec![2, 4, 6]);
        assert_eq!(output.last_page, 1);
    }

    #[test]
    fn test_empty_result_has_zero_last_page() {
        let result = SearchResult::<u8>::new(vec![], 0, &params(1, 15));
        let output = PaginationOutput::<u8>::from_result(vec![], &result);
        assert_eq!(output.last_page, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = SearchResult::new(vec!["a"], 1, &params(1, 15));
        let output = PaginationOutput::from_result(vec!["a"], &result);

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({ "items": ["a"], "total": 1, "currentPage": 1, "perPage": 15, "lastPage": 1 })
        );
    }
}
