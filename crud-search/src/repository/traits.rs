//! Repository trait definitions
//!
//! Async traits use RPITIT (Return Position Impl Trait In Traits), so no
//! `async_trait` is needed and implementors write plain `async fn`.
//!
//! - [`Repository`]: identity-keyed CRUD over [`Entity`] values
//! - [`SearchableRepository`]: adds paginated search driven by [`SearchParams`]
//!
//! # Example
//!
//! ```rust,ignore
//! use crud_search::repository::{Repository, RepositoryResult};
//!
//! impl Repository<ProductProps> for PgProductRepository {
//!     async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<ProductProps>> {
//!         sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
//!             .bind(id)
//!             .fetch_optional(&self.pool)
//!             .await?
//!             .map(Entity::from)
//!             .ok_or_else(|| RepositoryError::not_found("Product", id))
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::params::SearchParams;
use super::result::SearchResult;
use crate::entity::Entity;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// Lookups by id fail with a `NotFound` [`RepositoryError`] rather than
/// returning `Option`, so callers can propagate with `?`.
pub trait Repository<P: Send + Sync>: Send + Sync {
    /// Store a new entity
    ///
    /// # Errors
    ///
    /// `Conflict` if an entity with the same id is already stored.
    fn insert(&self, entity: Entity<P>) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Find an entity by its identifier
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity has this id.
    fn find_by_id(&self, id: &str) -> impl Future<Output = RepositoryResult<Entity<P>>> + Send;

    /// Every stored entity, in storage order
    fn find_all(&self) -> impl Future<Output = RepositoryResult<Vec<Entity<P>>>> + Send;

    /// Replace the stored entity that has the same id
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity has this id.
    fn update(&self, entity: Entity<P>) -> impl Future<Output = RepositoryResult<()>> + Send;

    /// Remove an entity by its identifier
    ///
    /// # Errors
    ///
    /// `NotFound` if no entity has this id.
    fn delete(&self, id: &str) -> impl Future<Output = RepositoryResult<()>> + Send;
}

/// Repository with filter/sort/paginate search
///
/// Every implementation honors the same semantics: filter first (`total` is
/// the filtered count), then sort by an allow-listed field, then slice the
/// requested page.
pub trait SearchableRepository<P: Send + Sync>: Repository<P> {
    /// Fields accepted as `sort`; anything else leaves the order unchanged
    fn sortable_fields(&self) -> &[&'static str];

    /// Run a search with already-normalized parameters
    fn search(
        &self,
        params: &SearchParams,
    ) -> impl Future<Output = RepositoryResult<SearchResult<Entity<P>>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryErrorKind;

    #[test]
    fn test_repository_result_type() {
        let ok_result: RepositoryResult<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: RepositoryResult<i32> = Err(RepositoryError::not_found("Test", "123"));
        assert_eq!(err_result.unwrap_err().kind, RepositoryErrorKind::NotFound);
    }

    // Compile-time check that the traits can be implemented with async fn

    struct NullRepository;

    impl Repository<String> for NullRepository {
        async fn insert(&self, _entity: Entity<String>) -> RepositoryResult<()> {
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<String>> {
            Err(RepositoryError::not_found("Null", id))
        }

        async fn find_all(&self) -> RepositoryResult<Vec<Entity<String>>> {
            Ok(Vec::new())
        }

        async fn update(&self, entity: Entity<String>) -> RepositoryResult<()> {
            Err(RepositoryError::not_found("Null", entity.id()))
        }

        async fn delete(&self, id: &str) -> RepositoryResult<()> {
            Err(RepositoryError::not_found("Null", id))
        }
    }

    impl SearchableRepository<String> for NullRepository {
        fn sortable_fields(&self) -> &[&'static str] {
            &[]
        }

        async fn search(&self, params: &SearchParams) -> RepositoryResult<SearchResult<Entity<String>>> {
            Ok(SearchResult::new(Vec::new(), 0, params))
        }
    }

    #[tokio::test]
    async fn test_traits_are_implementable() {
        let repo = NullRepository;
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(repo.find_by_id("x").await.unwrap_err().is_not_found());

        let result = repo.search(&SearchParams::default()).await.unwrap();
        assert_eq!(result.total(), 0);
        assert_eq!(result.last_page(), 0);
    }
}
