//! User use cases
//!
//! Each use case owns shared handles to its collaborators and exposes a
//! single `execute`. They are generic over the repository so the same code
//! runs against [`InMemoryUserRepository`](super::InMemoryUserRepository)
//! in tests and a database-backed repository in production.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use super::entity::{UserEntity, UserProps};
use super::hashing::HashProvider;
use super::output::UserOutput;
use super::repository::UserRepository;
use crate::error::{Error, Result};
use crate::pagination::PaginationOutput;
use crate::repository::{SearchInput, SearchParams};

const INPUT_NOT_PROVIDED: &str = "Input data not provided!";

/// Paginated user listing
pub struct ListUsers<R> {
    repository: Arc<R>,
}

impl<R: UserRepository> ListUsers<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Normalize `input`, search, and render each user as [`UserOutput`]
    pub async fn execute(&self, input: SearchInput) -> Result<PaginationOutput<UserOutput>> {
        let params = SearchParams::new(input);
        let result = self.repository.search(&params).await?;
        let items = result.items().iter().map(UserOutput::from).collect();
        Ok(PaginationOutput::from_result(items, &result))
    }
}

/// Fetch one user by id
pub struct GetUser<R> {
    repository: Arc<R>,
}

impl<R: UserRepository> GetUser<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &str) -> Result<UserOutput> {
        let entity = self.repository.find_by_id(id).await?;
        Ok(UserOutput::from(entity))
    }
}

/// Remove a user by id
pub struct DeleteUser<R> {
    repository: Arc<R>,
}

impl<R: UserRepository> DeleteUser<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;
        Ok(())
    }
}

/// Registration data; empty strings count as missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register a new user with a hashed password
pub struct Signup<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: HashProvider> Signup<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    pub async fn execute(&self, input: SignupInput) -> Result<UserOutput> {
        if input.name.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(Error::BadRequest(INPUT_NOT_PROVIDED.to_string()));
        }

        self.repository.email_exists(&input.email).await?;

        let password = self.hasher.generate_hash(&input.password)?;
        let entity = UserEntity::create_user(UserProps::new(input.name, input.email, password), None)?;
        self.repository.insert(entity.clone()).await?;

        info!(user_id = entity.id(), "User signed up");
        Ok(UserOutput::from(entity))
    }
}

/// Credentials; empty strings count as missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Check credentials and return the matching user
pub struct SignIn<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: HashProvider> SignIn<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown email, [`Error::InvalidCredentials`] for a
    /// wrong password.
    pub async fn execute(&self, input: SignInInput) -> Result<UserOutput> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(Error::BadRequest(INPUT_NOT_PROVIDED.to_string()));
        }

        let entity = self.repository.find_by_email(&input.email).await?;

        if !self.hasher.compare_hash(&input.password, entity.password())? {
            warn!(user_id = entity.id(), "Rejected sign-in with wrong password");
            return Err(Error::InvalidCredentials);
        }

        Ok(UserOutput::from(entity))
    }
}

/// New name for a user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserInput {
    pub id: String,
    pub name: String,
}

/// Rename a user
pub struct UpdateUser<R> {
    repository: Arc<R>,
}

impl<R: UserRepository> UpdateUser<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, input: UpdateUserInput) -> Result<UserOutput> {
        if input.name.is_empty() {
            return Err(Error::BadRequest("Name not provided".to_string()));
        }

        let mut entity = self.repository.find_by_id(&input.id).await?;
        entity.update_name(input.name)?;
        self.repository.update(entity.clone()).await?;

        info!(user_id = entity.id(), "User renamed");
        Ok(UserOutput::from(entity))
    }
}

/// Password change request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordInput {
    pub id: String,
    pub password: String,
    pub old_password: String,
}

/// Change a user's password after checking the old one
pub struct UpdatePassword<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: HashProvider> UpdatePassword<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    pub async fn execute(&self, input: UpdatePasswordInput) -> Result<UserOutput> {
        let mut entity = self.repository.find_by_id(&input.id).await?;

        if input.password.is_empty() || input.old_password.is_empty() {
            return Err(Error::InvalidPassword(
                "Old password and new password are required".to_string(),
            ));
        }

        if !self.hasher.compare_hash(&input.old_password, entity.password())? {
            return Err(Error::InvalidPassword("Old password does not match".to_string()));
        }

        let hash = self.hasher.generate_hash(&input.password)?;
        entity.update_password(hash)?;
        self.repository.update(entity.clone()).await?;

        info!(user_id = entity.id(), "User password changed");
        Ok(UserOutput::from(entity))
    }
}
