//! Field-level validation errors
//!
//! Entity constructors and mutators check their props and report every
//! failing field at once as a map of field name to messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Failed validation of one or more entity fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntityValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl EntityValidationError {
    /// Create an empty error set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// `Err(self)` when any field failed, `Ok(())` otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All failing fields with their messages
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl fmt::Display for EntityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity validation failed")?;
        for (i, (field, messages)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for EntityValidationError {}
