//! User repository contract and its in-memory implementation

use std::borrow::Cow;
use std::future::Future;

use tracing::debug;

use super::entity::{UserEntity, UserProps};
use crate::repository::{
    contains_ignore_case, sort_by_field, InMemoryRepository, RepositoryError, RepositoryOperation,
    RepositoryResult, SearchStrategy, SearchableRepository, SortDirection, SqlSearchTable,
};

/// Entity name used in user repository errors
pub const USER_ENTITY: &str = "User";

/// Fields users can be sorted by
pub const USER_SORTABLE_FIELDS: &[&str] = &["name", "createdAt"];

/// The `users` table as seen by the SQL search plan
///
/// Mirrors [`UserSearch`]: filter on `name`, sort by `name` (code point
/// order) or `createdAt`, newest first by default, ties in insertion order.
pub const USER_SEARCH_TABLE: SqlSearchTable = SqlSearchTable {
    table: "users",
    columns: &["id", "name", "email", "password", "created_at"],
    filter_column: "name",
    sortable: &[("name", "name COLLATE \"C\""), ("createdAt", "created_at")],
    default_order: Some(("created_at", SortDirection::Desc)),
    insertion_order: "seq",
};

/// Searchable user store with email lookups
pub trait UserRepository: SearchableRepository<UserProps> {
    /// Find the user registered with `email`
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has this email.
    fn find_by_email(&self, email: &str) -> impl Future<Output = RepositoryResult<UserEntity>> + Send;

    /// Check that `email` is still free
    ///
    /// # Errors
    ///
    /// `Conflict` if a user already has this email.
    fn email_exists(&self, email: &str) -> impl Future<Output = RepositoryResult<()>> + Send;
}

/// Search rules for users
///
/// The filter is a case-insensitive substring match on `name`. Without an
/// explicit sort, users come back newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSearch;

impl SearchStrategy<UserProps> for UserSearch {
    fn sortable_fields(&self) -> &[&'static str] {
        USER_SORTABLE_FIELDS
    }

    fn filter(&self, items: &[UserEntity], filter: &str) -> RepositoryResult<Vec<UserEntity>> {
        Ok(items
            .iter()
            .filter(|user| contains_ignore_case(user.name(), filter))
            .cloned()
            .collect())
    }

    fn sort<'a>(
        &self,
        items: Cow<'a, [UserEntity]>,
        sort: Option<&str>,
        sort_dir: Option<SortDirection>,
    ) -> Cow<'a, [UserEntity]> {
        match sort {
            None => sort_by_field(
                USER_SORTABLE_FIELDS,
                items,
                Some("createdAt"),
                Some(SortDirection::Desc),
            ),
            Some(field) => sort_by_field(USER_SORTABLE_FIELDS, items, Some(field), sort_dir),
        }
    }
}

/// In-memory user store
pub type InMemoryUserRepository = InMemoryRepository<UserProps, UserSearch>;

impl Default for InMemoryRepository<UserProps, UserSearch> {
    fn default() -> Self {
        Self::new(UserSearch, USER_ENTITY)
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<UserEntity> {
        debug!(email, "Looking up user by email");
        self.read_with(|items| items.iter().find(|user| user.email() == email).cloned())
            .await
            .ok_or_else(|| {
                RepositoryError::not_found(USER_ENTITY, email)
                    .with_operation(RepositoryOperation::FindByKey)
            })
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<()> {
        let taken = self
            .read_with(|items| items.iter().any(|user| user.email() == email))
            .await;
        if taken {
            return Err(RepositoryError::conflict(USER_ENTITY, email));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{Repository, RepositoryErrorKind, SearchInput, SearchParams};
    use chrono::{Duration, TimeZone, Utc};

    fn user(name: &str, email: &str) -> UserEntity {
        UserEntity::create_user(UserProps::new(name, email, "secret"), None).unwrap()
    }

    fn user_at(name: &str, minutes: i64) -> UserEntity {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let props = UserProps::new(name, format!("{name}@example.com"), "secret")
            .with_created_at(base + Duration::minutes(minutes));
        UserEntity::create_user(props, None).unwrap()
    }

    fn names(result: &[UserEntity]) -> Vec<&str> {
        result.iter().map(|u| u.name()).collect()
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = InMemoryUserRepository::default();
        let ada = user("Ada", "ada@example.com");
        repo.insert(ada.clone()).await.unwrap();

        assert_eq!(repo.find_by_email("ada@example.com").await.unwrap(), ada);

        let err = repo.find_by_email("nobody@example.com").await.unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::NotFound);
        assert_eq!(err.operation, RepositoryOperation::FindByKey);
        assert_eq!(err.entity_id.as_deref(), Some("nobody@example.com"));
    }

    #[tokio::test]
    async fn test_email_exists() {
        let repo = InMemoryUserRepository::default();
        repo.email_exists("ada@example.com").await.unwrap();

        repo.insert(user("Ada", "ada@example.com")).await.unwrap();
        let err = repo.email_exists("ada@example.com").await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_filter_matches_name_case_insensitively() {
        let items = vec![
            user("test", "a@example.com"),
            user("a", "b@example.com"),
            user("TEST", "c@example.com"),
        ];
        let filtered = UserSearch.filter(&items, "TeSt").unwrap();
        assert_eq!(names(&filtered), vec!["test", "TEST"]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let items = vec![user_at("first", 0), user_at("second", 1), user_at("third", 2)];
        let sorted = UserSearch.sort(Cow::Borrowed(&items[..]), None, None);
        assert_eq!(names(&sorted), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_explicit_sort() {
        let items = vec![user_at("b", 0), user_at("a", 1), user_at("c", 2)];

        let asc = UserSearch.sort(Cow::Borrowed(&items[..]), Some("name"), Some(SortDirection::Asc));
        assert_eq!(names(&asc), vec!["a", "b", "c"]);

        let desc = UserSearch.sort(Cow::Borrowed(&items[..]), Some("name"), None);
        assert_eq!(names(&desc), vec!["c", "b", "a"]);

        let oldest = UserSearch.sort(Cow::Borrowed(&items[..]), Some("createdAt"), Some(SortDirection::Asc));
        assert_eq!(names(&oldest), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unsortable_field_keeps_order() {
        let items = vec![user_at("b", 0), user_at("a", 1), user_at("c", 2)];
        let sorted = UserSearch.sort(Cow::Borrowed(&items[..]), Some("email"), Some(SortDirection::Asc));
        assert_eq!(names(&sorted), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_default_search_over_sixteen_users() {
        let repo = InMemoryUserRepository::default();
        for i in 0..16 {
            repo.insert(user_at(&format!("user{i}"), i)).await.unwrap();
        }

        let result = repo.search(&SearchParams::default()).await.unwrap();

        assert_eq!(result.total(), 16);
        assert_eq!(result.items().len(), 15);
        assert_eq!(result.last_page(), 2);
        assert_eq!(result.items()[0].name(), "user15");
        assert_eq!(result.items()[14].name(), "user1");
    }

    #[tokio::test]
    async fn test_filtered_sorted_search() {
        let repo = InMemoryUserRepository::default();
        for (i, name) in ["a", "AA", "Aa", "b", "c"].iter().enumerate() {
            repo.insert(user_at(name, i as i64)).await.unwrap();
        }

        let page1 = SearchParams::new(
            SearchInput::new()
                .with_page(1)
                .with_per_page(2)
                .with_sort("name")
                .with_sort_dir("asc")
                .with_filter("a"),
        );
        let result = repo.search(&page1).await.unwrap();
        assert_eq!(result.total(), 3);
        assert_eq!(names(result.items()), vec!["AA", "Aa"]);

        let page2 = SearchParams::new(
            SearchInput::new()
                .with_page(2)
                .with_per_page(2)
                .with_sort("name")
                .with_sort_dir("asc")
                .with_filter("a"),
        );
        let result = repo.search(&page2).await.unwrap();
        assert_eq!(names(result.items()), vec!["a"]);
    }

    #[test]
    fn test_sql_table_matches_in_memory_rules() {
        let sql_fields: Vec<_> = USER_SEARCH_TABLE.sortable.iter().map(|(field, _)| *field).collect();
        assert_eq!(sql_fields, USER_SORTABLE_FIELDS);

        let plan = crate::repository::SqlSearchPlan::build(&USER_SEARCH_TABLE, &SearchParams::default());
        assert!(plan.sql.contains("ORDER BY created_at DESC, seq ASC"));
    }

    #[test]
    fn test_sql_name_sort_uses_code_point_collation() {
        let params = SearchParams::new(
            SearchInput::new()
                .with_page(1)
                .with_per_page(2)
                .with_sort("name")
                .with_sort_dir("asc")
                .with_filter("a"),
        );
        let plan = crate::repository::SqlSearchPlan::build(&USER_SEARCH_TABLE, &params);
        assert!(plan.sql.contains("ORDER BY name COLLATE \"C\" ASC, seq ASC LIMIT $2 OFFSET $3"));

        // Code point order puts uppercase first, as the in-memory sort does
        let items = vec![user_at("a", 0), user_at("AA", 1), user_at("Aa", 2)];
        let sorted = UserSearch.sort(Cow::Borrowed(&items[..]), Some("name"), Some(SortDirection::Asc));
        assert_eq!(names(&sorted), vec!["AA", "Aa", "a"]);
    }

    #[tokio::test]
    async fn test_sortable_fields() {
        let repo = InMemoryUserRepository::default();
        assert_eq!(repo.sortable_fields(), &["name", "createdAt"]);
    }
}
