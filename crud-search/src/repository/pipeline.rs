//! Filter, sort and paginate over an in-memory candidate set
//!
//! [`run_search`] composes the three steps in a fixed order. The domain
//! specific parts (what a filter string matches, which fields may be sorted,
//! what ordering applies when none is requested) live behind
//! [`SearchStrategy`]; everything else is shared.
//!
//! # Example
//!
//! ```rust
//! use crud_search::entity::Entity;
//! use crud_search::repository::{
//!     run_search, FieldValue, Fields, RepositoryResult, SearchInput, SearchParams,
//!     SearchStrategy,
//! };
//!
//! #[derive(Debug, Clone)]
//! struct Tag {
//!     label: String,
//! }
//!
//! impl Fields for Tag {
//!     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
//!         match name {
//!             "label" => Some(FieldValue::Text(&self.label)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! struct TagSearch;
//!
//! impl SearchStrategy<Tag> for TagSearch {
//!     fn sortable_fields(&self) -> &[&'static str] {
//!         &["label"]
//!     }
//!
//!     fn filter(&self, items: &[Entity<Tag>], filter: &str) -> RepositoryResult<Vec<Entity<Tag>>> {
//!         Ok(items
//!             .iter()
//!             .filter(|t| t.props().label.starts_with(filter))
//!             .cloned()
//!             .collect())
//!     }
//! }
//!
//! let tags: Vec<_> = ["rust", "ruby", "go"]
//!     .into_iter()
//!     .map(|label| Entity::new(Tag { label: label.to_string() }))
//!     .collect();
//!
//! let params = SearchParams::new(
//!     SearchInput::new().with_filter("ru").with_sort("label").with_sort_dir("asc"),
//! );
//! let result = run_search(&TagSearch, &tags, &params).unwrap();
//!
//! assert_eq!(result.total(), 2);
//! assert_eq!(result.items()[0].props().label, "ruby");
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::params::{SearchParams, SortDirection};
use super::result::SearchResult;
use super::traits::RepositoryResult;
use crate::entity::Entity;

/// A borrowed view of one property, used for ordering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Text, compared by code point
    Text(&'a str),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value (`false < true`)
    Boolean(bool),
    /// Point in time
    Timestamp(DateTime<Utc>),
    /// Missing value
    Null,
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl FieldValue<'_> {
    /// Ascending ordering between two values
    ///
    /// Values of different kinds (and NaN) compare as equal, which leaves
    /// their relative order to the stable sort.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Named-field access on a properties bag
pub trait Fields {
    /// The value of the field called `name`, or `None` if there is no such field
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Domain hooks for the search pipeline
///
/// Implementors decide what a filter string matches and which fields may be
/// sorted. The default [`sort`](SearchStrategy::sort) orders by any declared
/// sortable field and leaves the order untouched otherwise; override it to
/// apply a default ordering when no sort was requested.
pub trait SearchStrategy<P: Fields + Clone>: Send + Sync {
    /// Fields that may appear in `ORDER BY`-style sorting
    fn sortable_fields(&self) -> &[&'static str];

    /// Keep only the items matching `filter`
    ///
    /// Only called with a non-empty filter. Errors propagate out of the
    /// search unchanged.
    fn filter(&self, items: &[Entity<P>], filter: &str) -> RepositoryResult<Vec<Entity<P>>>;

    /// Order the filtered items
    fn sort<'a>(
        &self,
        items: Cow<'a, [Entity<P>]>,
        sort: Option<&str>,
        sort_dir: Option<SortDirection>,
    ) -> Cow<'a, [Entity<P>]> {
        sort_by_field(self.sortable_fields(), items, sort, sort_dir)
    }
}

/// Run the filter step
///
/// With no filter the input slice is handed back borrowed and the strategy
/// is not consulted.
pub fn apply_filter<'a, P, S>(
    strategy: &S,
    items: &'a [Entity<P>],
    filter: Option<&str>,
) -> RepositoryResult<Cow<'a, [Entity<P>]>>
where
    P: Fields + Clone,
    S: SearchStrategy<P> + ?Sized,
{
    match filter {
        None => Ok(Cow::Borrowed(items)),
        Some(filter) => strategy.filter(items, filter).map(Cow::Owned),
    }
}

/// Stable sort by a declared sortable field
///
/// Returns `items` untouched when `field` is `None` or not in `sortable`.
/// A missing direction sorts descending.
pub fn sort_by_field<'a, P>(
    sortable: &[&str],
    items: Cow<'a, [Entity<P>]>,
    field: Option<&str>,
    sort_dir: Option<SortDirection>,
) -> Cow<'a, [Entity<P>]>
where
    P: Fields + Clone,
{
    let Some(field) = field else {
        return items;
    };
    if !sortable.contains(&field) {
        return items;
    }

    let direction = sort_dir.unwrap_or(SortDirection::Desc);
    let mut sorted = items.into_owned();
    sorted.sort_by(|a, b| {
        let left = a.props().field(field).unwrap_or(FieldValue::Null);
        let right = b.props().field(field).unwrap_or(FieldValue::Null);
        let ordering = left.compare(&right);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    Cow::Owned(sorted)
}

/// Copy out the window `[(page - 1) * per_page, page * per_page)`
///
/// A window starting past the end yields an empty page.
pub fn paginate<T: Clone>(items: &[T], page: u64, per_page: u64) -> Vec<T> {
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let start = usize::try_from(offset).unwrap_or(usize::MAX);
    let len = usize::try_from(per_page).unwrap_or(usize::MAX);

    items.iter().skip(start).take(len).cloned().collect()
}

/// Search `items` with the given strategy and parameters
///
/// The only failure is one raised by the strategy's filter.
pub fn run_search<P, S>(
    strategy: &S,
    items: &[Entity<P>],
    params: &SearchParams,
) -> RepositoryResult<SearchResult<Entity<P>>>
where
    P: Fields + Clone,
    S: SearchStrategy<P> + ?Sized,
{
    let filtered = apply_filter(strategy, items, params.filter())?;
    let total = filtered.len() as u64;
    let sorted = strategy.sort(filtered, params.sort(), params.sort_dir());
    let page = paginate(&sorted, params.page(), params.per_page());

    debug!(
        candidates = items.len(),
        total,
        page = params.page(),
        per_page = params.per_page(),
        returned = page.len(),
        "Search pipeline completed"
    );

    Ok(SearchResult::new(page, total, params))
}

/// Case-insensitive substring test, the usual text filter
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
