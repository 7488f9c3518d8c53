//! Search result
//!
//! The outcome of one search: a page of items, the pre-pagination total, and
//! the normalized query echoed back so callers can render "page X of Y"
//! without holding on to the raw parameters.

use serde::{Serialize, Serializer};

use super::params::{SearchParams, SortDirection};

/// One page of a search plus its pagination metadata
///
/// `last_page` is derived from `total` and `per_page` on every call and is
/// never stored. The constructor trusts its inputs; the pipeline is what
/// guarantees `items.len() <= per_page` and `total >= items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<T> {
    items: Vec<T>,
    total: u64,
    current_page: u64,
    per_page: u64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<String>,
}

impl<T> SearchResult<T> {
    /// Assemble a result for `params` from a page of items and the filtered total
    pub fn new(items: Vec<T>, total: u64, params: &SearchParams) -> Self {
        Self {
            items,
            total,
            current_page: params.page(),
            per_page: params.per_page(),
            sort: params.sort().map(ToOwned::to_owned),
            sort_dir: params.sort_dir(),
            filter: params.filter().map(ToOwned::to_owned),
        }
    }

    /// Items on the current page
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the result, keeping only its items
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items matching the filter, before pagination
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    #[must_use]
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    #[must_use]
    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// `ceil(total / per_page)`; zero when nothing matched
    #[must_use]
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }

    /// Transform every item while keeping the metadata
    pub fn map<U, F>(self, f: F) -> SearchResult<U>
    where
        F: FnMut(T) -> U,
    {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            sort: self.sort,
            sort_dir: self.sort_dir,
            filter: self.filter,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultJson<'a, T> {
    items: &'a [T],
    total: u64,
    current_page: u64,
    per_page: u64,
    last_page: u64,
    sort: Option<&'a str>,
    sort_dir: Option<SortDirection>,
    filter: Option<&'a str>,
}

impl<T: Serialize> Serialize for SearchResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SearchResultJson {
            items: &self.items,
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page(),
            sort: self.sort(),
            sort_dir: self.sort_dir,
            filter: self.filter(),
        }
        .serialize(serializer)
    }
}
