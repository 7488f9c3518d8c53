//! SQL rendition of the search pipeline
//!
//! [`SqlSearchPlan`] turns [`SearchParams`] into one statement that filters,
//! counts, orders and slices in a single round-trip. Building the plan is
//! pure, so the SQL is unit-tested without a database; the `database`
//! feature only executes it.
//!
//! The statement shape is:
//!
//! ```sql
//! SELECT totals.total, page.*
//! FROM (SELECT COUNT(*) AS total FROM users WHERE name ILIKE $1 ESCAPE '\') AS totals
//! LEFT JOIN LATERAL (
//!     SELECT ..., ROW_NUMBER() OVER (ORDER BY name COLLATE "C" ASC, seq ASC) AS row_position
//!     FROM users WHERE name ILIKE $1 ESCAPE '\'
//!     ORDER BY name COLLATE "C" ASC, seq ASC LIMIT $2 OFFSET $3
//! ) AS page ON TRUE
//! ORDER BY page.row_position
//! ```
//!
//! The lateral join always yields at least one row, so `total` is known even
//! when the requested page is past the end (the page columns are then NULL).
//! Text sort expressions carry `COLLATE "C"` so rows compare by code point,
//! the same order the in-memory pipeline produces.

use super::params::{SearchParams, SortDirection};

/// Static description of a searchable table
#[derive(Debug, Clone, Copy)]
pub struct SqlSearchTable {
    /// Table name
    pub table: &'static str,
    /// Columns selected for each row
    pub columns: &'static [&'static str],
    /// Column matched by the filter with a case-insensitive substring test
    pub filter_column: &'static str,
    /// Allow-list of `(sort field, ORDER BY expression)` pairs
    ///
    /// Text columns should carry `COLLATE "C"`.
    pub sortable: &'static [(&'static str, &'static str)],
    /// Ordering applied when no sort field is requested
    pub default_order: Option<(&'static str, SortDirection)>,
    /// Monotonic insertion column used to break ties
    pub insertion_order: &'static str,
}

/// A ready-to-bind search statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSearchPlan {
    /// Statement text with `$n` placeholders
    pub sql: String,
    /// `ILIKE` pattern, bound first when present
    pub filter_pattern: Option<String>,
    /// Page size, bound after the pattern
    pub limit: i64,
    /// Rows to skip, bound last
    pub offset: i64,
}

impl SqlSearchPlan {
    /// Build the statement for `params` against `table`
    pub fn build(table: &SqlSearchTable, params: &SearchParams) -> Self {
        let filter_pattern = params.filter().map(like_pattern);

        let (where_clause, limit_slot) = if filter_pattern.is_some() {
            (format!(" WHERE {} ILIKE $1 ESCAPE '\\'", table.filter_column), 2)
        } else {
            (String::new(), 1)
        };

        let order_by = order_by_clause(table, params);

        let sql = format!(
            "SELECT totals.total, page.* \
             FROM (SELECT COUNT(*) AS total FROM {table}{where_clause}) AS totals \
             LEFT JOIN LATERAL (\
             SELECT {columns}, ROW_NUMBER() OVER (ORDER BY {order_by}) AS row_position \
             FROM {table}{where_clause} \
             ORDER BY {order_by} \
             LIMIT ${limit_slot} OFFSET ${offset_slot}\
             ) AS page ON TRUE \
             ORDER BY page.row_position",
            table = table.table,
            columns = table.columns.join(", "),
            offset_slot = limit_slot + 1,
        );

        Self {
            sql,
            filter_pattern,
            limit: clamp_i64(params.per_page()),
            offset: clamp_i64(params.offset()),
        }
    }
}

fn order_by_clause(table: &SqlSearchTable, params: &SearchParams) -> String {
    let tie_break = format!("{} ASC", table.insertion_order);

    let primary = match params.sort() {
        None => table.default_order,
        Some(field) => table
            .sortable
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| (*column, params.sort_dir().unwrap_or(SortDirection::Desc))),
    };

    match primary {
        Some((column, direction)) => format!("{column} {}, {tie_break}", direction.as_sql()),
        None => tie_break,
    }
}

/// `%needle%` with LIKE metacharacters escaped by backslash
#[must_use]
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
