//! Flat user representation returned by use cases

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::UserEntity;

/// Plain copy of a user entity
///
/// Serializes exactly like [`UserEntity::to_json`](crate::entity::Entity::to_json).
/// Still carries the password hash; strip it with
/// [`UserPresenter`](crate::presenters::UserPresenter) before sending it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOutput {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserEntity> for UserOutput {
    fn from(entity: &UserEntity) -> Self {
        Self {
            id: entity.id().to_string(),
            name: entity.name().to_string(),
            email: entity.email().to_string(),
            password: entity.password().to_string(),
            created_at: entity.created_at(),
        }
    }
}

impl From<UserEntity> for UserOutput {
    fn from(entity: UserEntity) -> Self {
        let (id, props) = entity.into_parts();
        Self {
            id,
            name: props.name,
            email: props.email,
            password: props.password,
            created_at: props.created_at,
        }
    }
}
