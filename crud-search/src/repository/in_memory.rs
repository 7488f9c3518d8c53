//! In-memory repository
//!
//! Holds entities in a `Vec` behind a [`tokio::sync::RwLock`]. Writes take
//! the write lock; searches run the shared pipeline over the read-locked
//! collection and never mutate it.

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::{RepositoryError, RepositoryOperation};
use super::params::SearchParams;
use super::pipeline::{run_search, Fields, SearchStrategy};
use super::result::SearchResult;
use super::traits::{Repository, RepositoryResult, SearchableRepository};
use crate::entity::Entity;

/// Vec-backed repository parameterized by its search strategy
#[derive(Debug)]
pub struct InMemoryRepository<P, S> {
    items: RwLock<Vec<Entity<P>>>,
    strategy: S,
    entity_type: &'static str,
}

impl<P, S> InMemoryRepository<P, S> {
    /// Create an empty repository
    ///
    /// `entity_type` names the entity in error messages (e.g. `"User"`).
    pub fn new(strategy: S, entity_type: &'static str) -> Self {
        Self::with_items(strategy, entity_type, Vec::new())
    }

    /// Create a repository pre-populated with `items`
    pub fn with_items(strategy: S, entity_type: &'static str, items: Vec<Entity<P>>) -> Self {
        Self {
            items: RwLock::new(items),
            strategy,
            entity_type,
        }
    }

    /// The search strategy in use
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Name used for this entity in errors
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// Number of stored entities
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the repository is empty
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Run `f` against the current contents under the read lock
    pub(crate) async fn read_with<R>(&self, f: impl FnOnce(&[Entity<P>]) -> R) -> R {
        let items = self.items.read().await;
        f(&items)
    }

    fn not_found(&self, id: &str, operation: RepositoryOperation) -> RepositoryError {
        RepositoryError::not_found(self.entity_type, id).with_operation(operation)
    }
}

impl<P, S> Repository<P> for InMemoryRepository<P, S>
where
    P: Fields + Clone + Send + Sync,
    S: SearchStrategy<P>,
{
    async fn insert(&self, entity: Entity<P>) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        if items.iter().any(|item| item.id() == entity.id()) {
            return Err(RepositoryError::conflict(self.entity_type, entity.id())
                .with_operation(RepositoryOperation::Insert));
        }
        info!(entity_type = self.entity_type, id = entity.id(), "Inserted entity");
        items.push(entity);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Entity<P>> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| self.not_found(id, RepositoryOperation::FindById))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Entity<P>>> {
        Ok(self.items.read().await.clone())
    }

    async fn update(&self, entity: Entity<P>) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let slot = items
            .iter_mut()
            .find(|item| item.id() == entity.id())
            .ok_or_else(|| self.not_found(entity.id(), RepositoryOperation::Update))?;
        info!(entity_type = self.entity_type, id = entity.id(), "Updated entity");
        *slot = entity;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| self.not_found(id, RepositoryOperation::Delete))?;
        items.remove(index);
        info!(entity_type = self.entity_type, id, "Deleted entity");
        Ok(())
    }
}

impl<P, S> SearchableRepository<P> for InMemoryRepository<P, S>
where
    P: Fields + Clone + Send + Sync,
    S: SearchStrategy<P>,
{
    fn sortable_fields(&self) -> &[&'static str] {
        self.strategy.sortable_fields()
    }

    async fn search(&self, params: &SearchParams) -> RepositoryResult<SearchResult<Entity<P>>> {
        debug!(entity_type = self.entity_type, ?params, "Searching in-memory repository");
        let items = self.items.read().await;
        run_search(&self.strategy, &items, params)
            .map_err(|e| e.with_operation(RepositoryOperation::Search))
    }
}
