//! User entity and its validation rules

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::repository::{FieldValue, Fields};
use crate::validation::EntityValidationError;

const NAME_MAX_LEN: usize = 255;
const EMAIL_MAX_LEN: usize = 255;
const PASSWORD_MAX_LEN: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Properties of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProps {
    pub name: String,
    pub email: String,
    /// Password hash (or plaintext before hashing, in tests)
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl UserProps {
    /// Props stamped with the current time
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Check every field, collecting all failures
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        let mut errors = EntityValidationError::new();
        check_required(&mut errors, "name", &self.name, NAME_MAX_LEN);
        check_required(&mut errors, "email", &self.email, EMAIL_MAX_LEN);
        if !self.email.is_empty() && !EMAIL_REGEX.is_match(&self.email) {
            errors.add("email", "email must be an email");
        }
        check_required(&mut errors, "password", &self.password, PASSWORD_MAX_LEN);
        errors.into_result()
    }
}

fn check_required(errors: &mut EntityValidationError, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("{field} must be shorter than or equal to {max} characters"));
    }
    if value.is_empty() {
        errors.add(field, format!("{field} should not be empty"));
    }
}

impl Fields for UserProps {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "email" => Some(FieldValue::Text(&self.email)),
            "createdAt" => Some(FieldValue::Timestamp(self.created_at)),
            _ => None,
        }
    }
}

/// A user with identity
pub type UserEntity = Entity<UserProps>;

impl Entity<UserProps> {
    /// Validate `props` and build a user, generating an id when none is given
    pub fn create_user(props: UserProps, id: Option<String>) -> Result<Self, EntityValidationError> {
        props.validate()?;
        Ok(Self::from_parts(props, id))
    }

    pub fn name(&self) -> &str {
        &self.props().name
    }

    pub fn email(&self) -> &str {
        &self.props().email
    }

    pub fn password(&self) -> &str {
        &self.props().password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.props().created_at
    }

    /// Rename the user; the entity is unchanged if the new name is invalid
    pub fn update_name(&mut self, name: impl Into<String>) -> Result<(), EntityValidationError> {
        let candidate = UserProps {
            name: name.into(),
            ..self.props().clone()
        };
        candidate.validate()?;
        self.props_mut().name = candidate.name;
        Ok(())
    }

    /// Replace the stored password; the entity is unchanged if it is invalid
    pub fn update_password(&mut self, password: impl Into<String>) -> Result<(), EntityValidationError> {
        let candidate = UserProps {
            password: password.into(),
            ..self.props().clone()
        };
        candidate.validate()?;
        self.props_mut().password = candidate.password;
        Ok(())
    }
}
