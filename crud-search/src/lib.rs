//! # crud-search
//!
//! Generic CRUD repositories with a search pipeline: filter, sort and
//! paginate a candidate set of entities, then hand back a page together
//! with its pagination metadata.
//!
//! ## Features
//!
//! - **Entities**: [`Entity`](entity::Entity) pairs a string id with typed props
//! - **Search**: [`SearchParams`](repository::SearchParams) normalizes loose
//!   client input; [`run_search`](repository::run_search) composes the
//!   pipeline around a domain [`SearchStrategy`](repository::SearchStrategy)
//! - **Storage**: in-memory repositories, plus PostgreSQL behind the
//!   `database` feature
//! - **Users**: validated user entity, Argon2 hashing, and the signup,
//!   sign-in, listing and update use cases
//! - **Presenters**: JSON response shapes usable directly from axum handlers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use crud_search::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let users = Arc::new(InMemoryUserRepository::default());
//!     let page = ListUsers::new(users)
//!         .execute(SearchInput::new().with_filter("ali").with_per_page(10))
//!         .await?;
//!
//!     let presenter: CollectionPresenter<UserPresenter> = page.into();
//!     println!("{} users in total", presenter.meta.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod observability;
pub mod pagination;
pub mod presenters;
pub mod repository;
pub mod users;
pub mod validation;

#[cfg(feature = "database")]
pub mod database;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, ServiceConfig};
    pub use crate::entity::Entity;
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::PaginationOutput;
    pub use crate::presenters::{CollectionPresenter, PaginationPresenter, UserPresenter};
    pub use crate::repository::{
        InMemoryRepository, Repository, RepositoryError, RepositoryErrorKind, RepositoryResult,
        SearchInput, SearchParams, SearchResult, SearchStrategy, SearchableRepository,
        SortDirection,
    };
    pub use crate::users::{
        Argon2HashProvider, DeleteUser, GetUser, HashProvider, InMemoryUserRepository, ListUsers,
        SignIn, Signup, UpdatePassword, UpdateUser, UserEntity, UserOutput, UserProps,
        UserRepository,
    };
    pub use crate::validation::EntityValidationError;

    #[cfg(feature = "database")]
    pub use crate::database::create_pool;

    #[cfg(feature = "database")]
    pub use crate::users::PgUserRepository;
}
