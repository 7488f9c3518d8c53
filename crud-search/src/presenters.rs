//! Response presenters
//!
//! Wrap use case outputs in the JSON shapes sent to clients. Both
//! presenters implement axum's [`IntoResponse`], so a handler can return
//! them directly.
//!
//! # Example
//!
//! ```rust
//! use crud_search::pagination::PaginationOutput;
//! use crud_search::presenters::CollectionPresenter;
//!
//! let output = PaginationOutput {
//!     items: vec![1, 2, 3],
//!     total: 4,
//!     current_page: 1,
//!     per_page: 3,
//!     last_page: 2,
//! };
//! let presenter = CollectionPresenter::<i32>::from(output);
//! assert_eq!(presenter.meta.last_page, 2);
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationOutput;
use crate::users::UserOutput;

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPresenter {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserOutput> for UserPresenter {
    fn from(output: UserOutput) -> Self {
        Self {
            id: output.id,
            name: output.name,
            email: output.email,
            created_at: output.created_at,
        }
    }
}

impl IntoResponse for UserPresenter {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(serde_json::json!({ "data": self }))).into_response()
    }
}

/// Pagination block of a collection response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPresenter {
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub total: u64,
}

/// `{ data: [...], meta: { currentPage, perPage, lastPage, total } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPresenter<T> {
    pub data: Vec<T>,
    pub meta: PaginationPresenter,
}

impl<T> CollectionPresenter<T> {
    /// Map each item to another representation
    pub fn map<U, F>(self, f: F) -> CollectionPresenter<U>
    where
        F: FnMut(T) -> U,
    {
        CollectionPresenter {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<T> From<PaginationOutput<T>> for CollectionPresenter<T> {
    fn from(output: PaginationOutput<T>) -> Self {
        Self {
            data: output.items,
            meta: PaginationPresenter {
                current_page: output.current_page,
                per_page: output.per_page,
                last_page: output.last_page,
                total: output.total,
            },
        }
    }
}

/// Users listing with password hashes stripped
impl From<PaginationOutput<UserOutput>> for CollectionPresenter<UserPresenter> {
    fn from(output: PaginationOutput<UserOutput>) -> Self {
        CollectionPresenter::<UserOutput>::from(output).map(UserPresenter::from)
    }
}

impl<T: Serialize> IntoResponse for CollectionPresenter<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_output() -> UserOutput {
        UserOutput {
            id: "8544973c-d1da-41e7-a4fd-f26d54d2f1b2".to_string(),
            name: "fake name".to_string(),
            email: "test@mail.com".to_string(),
            password: "fakepassword".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_user_presenter_omits_password() {
        let presenter = UserPresenter::from(user_output());
        let json = serde_json::to_value(&presenter).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "8544973c-d1da-41e7-a4fd-f26d54d2f1b2",
                "name": "fake name",
                "email": "test@mail.com",
                "createdAt": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_collection_presenter_shape() {
        let presenter = CollectionPresenter::<i32>::from(PaginationOutput {
            items: vec![1, 2, 3],
            total: 4,
            current_page: 1,
            per_page: 2,
            last_page: 2,
        });

        assert_eq!(
            serde_json::to_value(&presenter).unwrap(),
            json!({
                "data": [1, 2, 3],
                "meta": { "currentPage": 1, "perPage": 2, "lastPage": 2, "total": 4 }
            })
        );
    }

    #[test]
    fn test_user_collection_strips_passwords() {
        let presenter: CollectionPresenter<UserPresenter> = PaginationOutput {
            items: vec![user_output()],
            total: 1,
            current_page: 1,
            per_page: 15,
            last_page: 1,
        }
        .into();

        let json = serde_json::to_value(&presenter).unwrap();
        assert!(json["data"][0].get("password").is_none());
        assert_eq!(json["meta"]["total"], 1);
    }

    #[test]
    fn test_into_response_status() {
        assert_eq!(UserPresenter::from(user_output()).into_response().status(), StatusCode::OK);

        let presenter = CollectionPresenter::<u8>::from(PaginationOutput {
            items: vec![],
            total: 0,
            current_page: 1,
            per_page: 15,
            last_page: 0,
        });
        assert_eq!(presenter.into_response().status(), StatusCode::OK);
    }
}
