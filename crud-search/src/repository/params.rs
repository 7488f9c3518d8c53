//! Search parameters
//!
//! [`SearchInput`] is the loosely-typed bag that arrives from the outside
//! (query strings, JSON bodies). [`SearchParams`] is its normalized form:
//! building one never fails, and once built every field is valid, so nothing
//! downstream re-checks page numbers, sort fields or directions.
//!
//! # Example
//!
//! ```rust
//! use crud_search::repository::{SearchInput, SearchParams, SortDirection};
//!
//! let params = SearchParams::new(
//!     SearchInput::new()
//!         .with_page("2")
//!         .with_per_page(-5)
//!         .with_sort("name")
//!         .with_sort_dir("ASC"),
//! );
//!
//! assert_eq!(params.page(), 2);
//! assert_eq!(params.per_page(), 15);
//! assert_eq!(params.sort(), Some("name"));
//! assert_eq!(params.sort_dir(), Some(SortDirection::Asc));
//! assert_eq!(params.filter(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page used when the requested page is not a positive integer
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the requested page size is not a positive integer
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Sort direction for search queries
///
/// # Example
///
/// ```rust
/// use crud_search::repository::SortDirection;
///
/// assert_eq!(SortDirection::Asc.to_string(), "asc");
/// assert_eq!(SortDirection::Desc.as_sql(), "DESC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Non-decreasing order
    Asc,
    /// Non-increasing order
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl SortDirection {
    /// Convert to an SQL `ORDER BY` fragment
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Interpret a raw direction: only a case-insensitive `"asc"` is ascending
    fn from_raw(raw: Option<&Value>) -> Self {
        match raw.and_then(stringify) {
            Some(s) if s.to_lowercase() == "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Raw, untrusted search input
///
/// Every field accepts any JSON value. Deserializes from camelCase keys
/// (`perPage`, `sortDir`) and also accepts snake_case aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Requested page number (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Value>,

    /// Requested page size
    #[serde(default, alias = "per_page", skip_serializing_if = "Option::is_none")]
    pub per_page: Option<Value>,

    /// Field name to sort by
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,

    /// Sort direction (`asc` or `desc`)
    #[serde(default, alias = "sort_dir", skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<Value>,

    /// Free-form filter, interpreted by the concrete repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl SearchInput {
    /// Create an empty input (every field absent)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw page value
    #[must_use]
    pub fn with_page(mut self, page: impl Into<Value>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Set the raw page size value
    #[must_use]
    pub fn with_per_page(mut self, per_page: impl Into<Value>) -> Self {
        self.per_page = Some(per_page.into());
        self
    }

    /// Set the raw sort field
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<Value>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set the raw sort direction
    #[must_use]
    pub fn with_sort_dir(mut self, sort_dir: impl Into<Value>) -> Self {
        self.sort_dir = Some(sort_dir.into());
        self
    }

    /// Set the raw filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<Value>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Normalized search parameters
///
/// Invariants upheld by construction:
/// - `page >= 1` and `per_page >= 1`
/// - `sort_dir` is `None` exactly when `sort` is `None`
/// - `sort` and `filter` are never empty strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    page: u64,
    per_page: u64,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<String>,
}

impl SearchParams {
    /// Normalize raw input. Never fails.
    pub fn new(input: SearchInput) -> Self {
        let page = positive_integer(input.page.as_ref()).unwrap_or(DEFAULT_PAGE);
        let per_page = positive_integer(input.per_page.as_ref()).unwrap_or(DEFAULT_PER_PAGE);
        let sort = non_empty_string(input.sort.as_ref());
        let sort_dir = sort
            .as_ref()
            .map(|_| SortDirection::from_raw(input.sort_dir.as_ref()));
        let filter = non_empty_string(input.filter.as_ref());

        Self {
            page,
            per_page,
            sort,
            sort_dir,
            filter,
        }
    }

    /// Requested page (1-indexed)
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Requested page size
    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Field to sort by, if any
    #[must_use]
    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Sort direction; `Some` whenever `sort` is `Some`
    #[must_use]
    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    /// Filter value, if any
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Number of items preceding the requested page
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new(SearchInput::default())
    }
}

impl From<SearchInput> for SearchParams {
    fn from(input: SearchInput) -> Self {
        Self::new(input)
    }
}

/// `Some(n)` when the value, read as a number, is a finite integer >= 1
///
/// Numeric strings count; booleans, null, arrays and objects do not.
fn positive_integer(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => match n.as_u64() {
            Some(v) => (v >= 1).then_some(v),
            None => n.as_f64().and_then(integral),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().and_then(integral)
        }
        _ => None,
    }
}

fn integral(value: f64) -> Option<u64> {
    let valid = value.is_finite() && value >= 1.0 && value.fract() == 0.0;
    // Saturates for values beyond u64::MAX
    valid.then_some(value as u64)
}

/// `None` for null, absent or empty-string values; otherwise the string form
///
/// A value whose string form is empty (such as `[]`) also counts as absent.
fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if s.is_empty() => None,
        other => stringify(other).filter(|s| !s.is_empty()),
    }
}

/// String form of a raw value, following JavaScript's `String(value)`
///
/// Objects become `[object Object]`; arrays join their elements with `,`,
/// rendering nested nulls as empty.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(script_string(other)),
    }
}

fn script_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => script_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn not_positive_integers() -> Vec<Value> {
        vec![
            Value::Null,
            json!(""),
            json!("test"),
            json!(0),
            json!(-1),
            json!(5.5),
            json!("5.5"),
            json!(true),
            json!(false),
            json!({}),
            json!([]),
            json!("NaN"),
            json!("Infinity"),
        ]
    }

    #[test]
    fn test_default_params() {
        let params = SearchParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 15);
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
        assert_eq!(params.filter(), None);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_normalizes_to_one() {
        for raw in not_positive_integers() {
            let params = SearchParams::new(SearchInput::new().with_page(raw.clone()));
            assert_eq!(params.page(), 1, "raw page {raw}");
        }
    }

    #[test]
    fn test_page_keeps_positive_integers() {
        for (raw, expected) in [(json!(1), 1), (json!(2), 2), (json!(10), 10), (json!("3"), 3), (json!(4.0), 4)] {
            let params = SearchParams::new(SearchInput::new().with_page(raw.clone()));
            assert_eq!(params.page(), expected, "raw page {raw}");
        }
    }

    #[test]
    fn test_per_page_normalizes_to_default() {
        for raw in not_positive_integers() {
            let params = SearchParams::new(SearchInput::new().with_per_page(raw.clone()));
            assert_eq!(params.per_page(), 15, "raw per_page {raw}");
        }
    }

    #[test]
    fn test_per_page_keeps_positive_integers_without_upper_bound() {
        for (raw, expected) in [(json!(1), 1), (json!(2), 2), (json!(25), 25), (json!("10"), 10), (json!(100_000), 100_000)] {
            let params = SearchParams::new(SearchInput::new().with_per_page(raw.clone()));
            assert_eq!(params.per_page(), expected, "raw per_page {raw}");
        }
    }

    #[test]
    fn test_sort_normalization() {
        let cases = [
            (Value::Null, None),
            (json!(""), None),
            (json!("test"), Some("test")),
            (json!(0), Some("0")),
            (json!(-1), Some("-1")),
            (json!(5.5), Some("5.5")),
            (json!(true), Some("true")),
            (json!(false), Some("false")),
            (json!({}), Some("[object Object]")),
            (json!({ "a": 1 }), Some("[object Object]")),
            (json!(["name", 1, null, true]), Some("name,1,,true")),
            (json!([["a", "b"], {}]), Some("a,b,[object Object]")),
            (json!([]), None),
            (json!(4.0), Some("4")),
        ];
        for (raw, expected) in cases {
            let params = SearchParams::new(SearchInput::new().with_sort(raw.clone()));
            assert_eq!(params.sort(), expected, "raw sort {raw}");
        }
        assert_eq!(SearchParams::new(SearchInput::new()).sort(), None);
    }

    #[test]
    fn test_sort_dir_is_none_without_sort() {
        for raw in [Value::Null, json!(""), json!("asc"), json!("desc"), json!("ASC")] {
            let params = SearchParams::new(SearchInput::new().with_sort_dir(raw.clone()));
            assert_eq!(params.sort_dir(), None, "raw sort_dir {raw}");

            let params = SearchParams::new(SearchInput::new().with_sort("").with_sort_dir(raw.clone()));
            assert_eq!(params.sort_dir(), None, "raw sort_dir {raw} with empty sort");
        }
    }

    #[test]
    fn test_sort_dir_with_sort() {
        let cases = [
            (Value::Null, SortDirection::Desc),
            (json!(""), SortDirection::Desc),
            (json!("asc"), SortDirection::Asc),
            (json!("ASC"), SortDirection::Asc),
            (json!("AsC"), SortDirection::Asc),
            (json!("desc"), SortDirection::Desc),
            (json!("DESC"), SortDirection::Desc),
            (json!("test"), SortDirection::Desc),
            (json!(0), SortDirection::Desc),
            (json!(true), SortDirection::Desc),
            (json!({}), SortDirection::Desc),
        ];
        for (raw, expected) in cases {
            let params = SearchParams::new(SearchInput::new().with_sort("field").with_sort_dir(raw.clone()));
            assert_eq!(params.sort_dir(), Some(expected), "raw sort_dir {raw}");
        }

        let params = SearchParams::new(SearchInput::new().with_sort("field"));
        assert_eq!(params.sort_dir(), Some(SortDirection::Desc));
    }

    #[test]
    fn test_filter_normalization() {
        let cases = [
            (Value::Null, None),
            (json!(""), None),
            (json!("test"), Some("test")),
            (json!(0), Some("0")),
            (json!(-1), Some("-1")),
            (json!(5.5), Some("5.5")),
            (json!(true), Some("true")),
            (json!(false), Some("false")),
            (json!({}), Some("[object Object]")),
            (json!(["ali", "bob"]), Some("ali,bob")),
            (json!([null]), None),
        ];
        for (raw, expected) in cases {
            let params = SearchParams::new(SearchInput::new().with_filter(raw.clone()));
            assert_eq!(params.filter(), expected, "raw filter {raw}");
        }
    }

    #[test]
    fn test_object_sort_and_filter_use_script_string_form() {
        let params = SearchParams::new(SearchInput::new().with_sort(json!({})).with_filter(json!({})));
        assert_eq!(params.sort(), Some("[object Object]"));
        assert_eq!(params.filter(), Some("[object Object]"));
        assert_eq!(params.sort_dir(), Some(SortDirection::Desc));
    }

    #[test]
    fn test_offset() {
        let params = SearchParams::new(SearchInput::new().with_page(3).with_per_page(20));
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_offset_saturates() {
        let params = SearchParams::new(SearchInput::new().with_page(u64::MAX).with_per_page(u64::MAX));
        assert_eq!(params.offset(), u64::MAX);
    }

    #[test]
    fn test_deserializes_camel_and_snake_case() {
        let input: SearchInput = serde_json::from_value(json!({
            "page": "2",
            "perPage": 5,
            "sort": "name",
            "sortDir": "asc",
            "filter": "ali"
        }))
        .unwrap();
        let params = SearchParams::from(input);
        assert_eq!(params.page(), 2);
        assert_eq!(params.per_page(), 5);
        assert_eq!(params.sort_dir(), Some(SortDirection::Asc));
        assert_eq!(params.filter(), Some("ali"));

        let input: SearchInput =
            serde_json::from_value(json!({ "per_page": 7, "sort": "name", "sort_dir": "asc" })).unwrap();
        let params = SearchParams::from(input);
        assert_eq!(params.per_page(), 7);
        assert_eq!(params.sort_dir(), Some(SortDirection::Asc));
    }

    #[test]
    fn test_serializes_camel_case() {
        let params = SearchParams::new(SearchInput::new().with_sort("name").with_sort_dir("asc"));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "page": 1, "perPage": 15, "sort": "name", "sortDir": "asc", "filter": null })
        );
    }
}
