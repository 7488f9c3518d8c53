//! Repository error types
//!
//! Repositories report failures through a single structured error carrying the
//! operation that failed, a coarse [`RepositoryErrorKind`], and optional entity
//! context. The search pipeline never constructs these itself; they come from
//! concrete repositories and propagate unchanged.
//!
//! # Example
//!
//! ```rust
//! use crud_search::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("User", "3fa85f64-5717-4562-b3fc-2c963f66afa6");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Inserting a new entity
    Insert,
    /// Finding a single entity by ID
    FindById,
    /// Listing every entity
    FindAll,
    /// Replacing an existing entity
    Update,
    /// Removing an entity
    Delete,
    /// Running the filter/sort/paginate pipeline
    Search,
    /// Looking an entity up by a unique secondary key (e.g. email)
    FindByKey,
    /// Checking a uniqueness constraint before a write
    Uniqueness,
    /// Establishing a connection to the store
    Connect,
    /// Creating or migrating the store's schema
    Schema,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Search => write!(f, "search"),
            Self::FindByKey => write!(f, "find_by_key"),
            Self::Uniqueness => write!(f, "uniqueness"),
            Self::Connect => write!(f, "connect"),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// A uniqueness rule was violated (duplicate key, email already taken)
    Conflict,
    /// Entity data failed validation before reaching the store
    ValidationFailed,
    /// Failed to connect to the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Row could not be mapped to or from an entity
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// # Example
///
/// ```rust
/// use crud_search::repository::{RepositoryError, RepositoryOperation};
///
/// let error = RepositoryError::not_found("User", "usr_abc123")
///     .with_operation(RepositoryOperation::Delete);
/// assert_eq!(
///     error.to_string(),
///     "Repository not_found error during delete: Entity not found [User: usr_abc123]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "User")
    pub entity_type: Option<String>,
    /// The ID (or other identifying key) of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error without entity context
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    ///
    /// The operation defaults to [`RepositoryOperation::FindById`]; chain
    /// [`with_operation`](Self::with_operation) for updates and deletes.
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a "conflict" error for a violated uniqueness rule
    ///
    /// # Example
    ///
    /// ```rust
    /// use crud_search::repository::{RepositoryError, RepositoryErrorKind};
    ///
    /// let error = RepositoryError::conflict("User", "duplicate@example.com");
    /// assert_eq!(error.kind, RepositoryErrorKind::Conflict);
    /// ```
    pub fn conflict(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Uniqueness,
            kind: RepositoryErrorKind::Conflict,
            message: "Entity already exists".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(identifier.into()),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ValidationFailed, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }

    /// Whether this is a "conflict" error
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == RepositoryErrorKind::Conflict
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    ///
    /// Repositories never retry on their own; this only informs callers.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(feature = "database")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        // Operation is unknown here; callers refine it with `with_operation`.
        let operation = RepositoryOperation::Search;
        match err {
            E::RowNotFound => Self::new(operation, RepositoryErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::timeout(operation, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed(operation, "Connection pool is closed"),
            E::Io(e) => Self::connection_failed(operation, e.to_string()),
            E::Tls(e) => Self::connection_failed(operation, format!("TLS error: {}", e)),
            E::ColumnNotFound(col) => {
                Self::serialization_error(operation, format!("Column not found: {}", col))
            }
            E::ColumnDecode { index, source } => Self::serialization_error(
                operation,
                format!("Failed to decode column {}: {}", index, source),
            ),
            E::Database(db_err) => {
                if db_err.is_unique_violation() {
                    Self::new(operation, RepositoryErrorKind::Conflict, db_err.to_string())
                } else {
                    Self::database_error(operation, db_err.to_string())
                }
            }
            other => Self::database_error(operation, other.to_string()),
        }
    }
}
