//! Users domain
//!
//! A user entity with field validation, its repository contract (in-memory
//! and, with the `database` feature, PostgreSQL), Argon2 password hashing,
//! and the use cases built on top.

mod entity;
mod hashing;
mod output;
#[cfg(feature = "database")]
mod postgres;
mod repository;
mod use_cases;

pub use entity::{UserEntity, UserProps};
pub use hashing::{Argon2HashProvider, HashProvider};
pub use output::UserOutput;
#[cfg(feature = "database")]
pub use postgres::PgUserRepository;
pub use repository::{
    InMemoryUserRepository, UserRepository, UserSearch, USER_ENTITY, USER_SEARCH_TABLE,
    USER_SORTABLE_FIELDS,
};
pub use use_cases::{
    DeleteUser, GetUser, ListUsers, SignIn, SignInInput, Signup, SignupInput, UpdatePassword,
    UpdatePasswordInput, UpdateUser, UpdateUserInput,
};
