//! PostgreSQL-backed user repository
//!
//! Search runs as a single statement built by
//! [`SqlSearchPlan`](crate::repository::SqlSearchPlan), with the same
//! filter, sort and pagination rules as the in-memory repository.

use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, info};

use super::entity::{UserEntity, UserProps};
use super::repository::{UserRepository, USER_ENTITY, USER_SEARCH_TABLE, USER_SORTABLE_FIELDS};
use crate::repository::{
    Repository, RepositoryError, RepositoryOperation, RepositoryResult, SearchParams,
    SearchResult, SearchableRepository, SqlSearchPlan,
};

const CREATE_USERS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS users (
    seq BIGSERIAL NOT NULL,
    id TEXT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

const SELECT_USER: &str = "SELECT id, name, email, password, created_at FROM users";

/// User repository over a `users` table
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table if it does not exist
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Schema))?;
        Ok(())
    }

    async fn find_one(
        &self,
        column: &str,
        value: &str,
        operation: RepositoryOperation,
    ) -> RepositoryResult<UserEntity> {
        let sql = format!("{SELECT_USER} WHERE {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        match row {
            Some(row) => user_from_row(&row, operation),
            None => Err(RepositoryError::not_found(USER_ENTITY, value).with_operation(operation)),
        }
    }
}

fn user_from_row(row: &PgRow, operation: RepositoryOperation) -> RepositoryResult<UserEntity> {
    let decode = |e: sqlx::Error| RepositoryError::from(e).with_operation(operation);
    let props = UserProps {
        name: row.try_get("name").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        password: row.try_get("password").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
    };
    let id: String = row.try_get("id").map_err(decode)?;
    Ok(UserEntity::with_id(props, id))
}

impl Repository<UserProps> for PgUserRepository {
    async fn insert(&self, entity: UserEntity) -> RepositoryResult<()> {
        let props = entity.props();
        sqlx::query(
            "INSERT INTO users (id, name, email, password, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entity.id())
        .bind(&props.name)
        .bind(&props.email)
        .bind(&props.password)
        .bind(props.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from(e)
                .with_operation(RepositoryOperation::Insert)
                .with_entity(USER_ENTITY, entity.id())
        })?;

        info!(user_id = entity.id(), "Inserted user");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<UserEntity> {
        self.find_one("id", id, RepositoryOperation::FindById).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<UserEntity>> {
        let sql = format!("{SELECT_USER} ORDER BY seq ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindAll))?;

        rows.iter()
            .map(|row| user_from_row(row, RepositoryOperation::FindAll))
            .collect()
    }

    async fn update(&self, entity: UserEntity) -> RepositoryResult<()> {
        let props = entity.props();
        let affected = sqlx::query(
            "UPDATE users SET name = $2, email = $3, password = $4, created_at = $5 WHERE id = $1",
        )
        .bind(entity.id())
        .bind(&props.name)
        .bind(&props.email)
        .bind(&props.password)
        .bind(props.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
        .rows_affected();

        if affected == 0 {
            return Err(RepositoryError::not_found(USER_ENTITY, entity.id())
                .with_operation(RepositoryOperation::Update));
        }
        info!(user_id = entity.id(), "Updated user");
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Delete))?
            .rows_affected();

        if affected == 0 {
            return Err(RepositoryError::not_found(USER_ENTITY, id)
                .with_operation(RepositoryOperation::Delete));
        }
        info!(user_id = id, "Deleted user");
        Ok(())
    }
}

impl SearchableRepository<UserProps> for PgUserRepository {
    fn sortable_fields(&self) -> &[&'static str] {
        USER_SORTABLE_FIELDS
    }

    async fn search(&self, params: &SearchParams) -> RepositoryResult<SearchResult<UserEntity>> {
        let plan = SqlSearchPlan::build(&USER_SEARCH_TABLE, params);
        debug!(sql = %plan.sql, ?params, "Searching users");

        let mut query = sqlx::query(&plan.sql);
        if let Some(pattern) = &plan.filter_pattern {
            query = query.bind(pattern);
        }
        let rows = query
            .bind(plan.limit)
            .bind(plan.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Search))?;

        let decode = |e: sqlx::Error| RepositoryError::from(e).with_operation(RepositoryOperation::Search);

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total").map_err(decode)?,
            None => 0,
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            // An out-of-range page still yields one row carrying only the total
            let id: Option<String> = row.try_get("id").map_err(decode)?;
            if id.is_some() {
                items.push(user_from_row(row, RepositoryOperation::Search)?);
            }
        }

        Ok(SearchResult::new(items, u64::try_from(total).unwrap_or(0), params))
    }
}

impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<UserEntity> {
        self.find_one("email", email, RepositoryOperation::FindByKey).await
    }

    async fn email_exists(&self, email: &str) -> RepositoryResult<()> {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Uniqueness))?;

        if taken {
            return Err(RepositoryError::conflict(USER_ENTITY, email));
        }
        Ok(())
    }
}
