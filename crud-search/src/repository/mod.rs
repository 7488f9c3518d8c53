//! Repository contracts and the search pipeline
//!
//! # Features
//!
//! - **CRUD**: [`Repository`] with `NotFound` / `Conflict` errors
//! - **Search**: [`SearchableRepository`] taking normalized [`SearchParams`]
//!   and returning a [`SearchResult`]
//! - **Pipeline**: [`run_search`] composes filter, sort and paginate over a
//!   candidate set, with domain rules supplied by a [`SearchStrategy`]
//! - **In-memory storage**: [`InMemoryRepository`] for tests and local runs
//! - **SQL plan**: [`SqlSearchPlan`] renders the same pipeline as one query
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_search::repository::{SearchInput, SearchParams, SearchableRepository};
//!
//! let params = SearchParams::new(SearchInput::new().with_filter("ali").with_per_page(10));
//! let result = repo.search(&params).await?;
//! println!("page {} of {}", result.current_page(), result.last_page());
//! ```

mod error;
mod in_memory;
mod params;
mod pipeline;
mod result;
mod sql;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use in_memory::InMemoryRepository;
pub use params::{SearchInput, SearchParams, SortDirection, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use pipeline::{
    apply_filter, contains_ignore_case, paginate, run_search, sort_by_field, FieldValue, Fields,
    SearchStrategy,
};
pub use result::SearchResult;
pub use sql::{like_pattern, SqlSearchPlan, SqlSearchTable};
pub use traits::{Repository, RepositoryResult, SearchableRepository};
