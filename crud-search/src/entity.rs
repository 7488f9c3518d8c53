//! Identity-bearing domain values
//!
//! Every domain object is an [`Entity`] wrapping a typed properties bag. The
//! identifier is fixed at construction: either supplied by the caller (and
//! trusted as-is) or generated as a random UUID.
//!
//! # Example
//!
//! ```rust
//! use crud_search::entity::Entity;
//! use serde::Serialize;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize)]
//! struct Product {
//!     name: String,
//!     price: i64,
//! }
//!
//! let product = Entity::new(Product { name: "lamp".to_string(), price: 10 });
//! let json = product.to_json().unwrap();
//! assert_eq!(json["id"], product.id());
//! assert_eq!(json["name"], "lamp");
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A domain value with an immutable identifier and a properties bag
///
/// Two entities are equal when they share the same concrete props type, the
/// same `id`, and equal props. Serializes to `{ "id": ..., ...props }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity<P> {
    id: String,
    #[serde(flatten)]
    props: P,
}

impl<P> Entity<P> {
    /// Create an entity with a freshly generated UUID
    pub fn new(props: P) -> Self {
        Self::from_parts(props, None)
    }

    /// Create an entity with a caller-supplied identifier
    ///
    /// The identifier is not format-checked here.
    pub fn with_id(props: P, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            props,
        }
    }

    /// Create an entity from props and an optional identifier
    pub fn from_parts(props: P, id: Option<String>) -> Self {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        Self { id, props }
    }

    /// The entity identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read access to the properties bag
    #[must_use]
    pub fn props(&self) -> &P {
        &self.props
    }

    /// Mutable access for domain methods that re-validate before writing
    pub(crate) fn props_mut(&mut self) -> &mut P {
        &mut self.props
    }

    /// Consume the entity, returning its identifier and props
    #[must_use]
    pub fn into_parts(self) -> (String, P) {
        (self.id, self.props)
    }
}

impl<P: Serialize> Entity<P> {
    /// Serialize to a JSON object of the form `{ id, ...props }`
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct StubProps {
        name: String,
        price: i64,
    }

    fn stub_props() -> StubProps {
        StubProps {
            name: "entity".to_string(),
            price: 50,
        }
    }

    #[test]
    fn test_generates_uuid_when_id_missing() {
        let entity = Entity::new(stub_props());
        assert!(Uuid::parse_str(entity.id()).is_ok());
        assert_eq!(entity.props(), &stub_props());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Entity::new(stub_props());
        let b = Entity::new(stub_props());
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_accepts_supplied_id_as_is() {
        let entity = Entity::with_id(stub_props(), "not-a-uuid");
        assert_eq!(entity.id(), "not-a-uuid");

        let entity = Entity::from_parts(stub_props(), Some("abc".to_string()));
        assert_eq!(entity.id(), "abc");
    }

    #[test]
    fn test_to_json_flattens_props() {
        let id = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let entity = Entity::with_id(stub_props(), id);
        assert_eq!(
            entity.to_json().unwrap(),
            json!({ "id": id, "name": "entity", "price": 50 })
        );
    }

    #[test]
    fn test_equality_requires_same_id_and_props() {
        let a = Entity::with_id(stub_props(), "1");
        let b = Entity::with_id(stub_props(), "1");
        assert_eq!(a, b);

        let mut other = stub_props();
        other.price = 51;
        assert_ne!(a, Entity::with_id(other, "1"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let entity = Entity::new(stub_props());
        let json = entity.to_json().unwrap();
        let back: Entity<StubProps> = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }
}
