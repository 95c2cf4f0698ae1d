//! # Directory Entities
//!
//! The four record kinds of the directory. Each is a plain serde struct
//! whose field names match the backend's JSON schema, with an [`Entity`]
//! implementation declaring its collection, field table and by-name access.
//!
//! [`Entity`]: crate::record::Entity

mod activity_type;
mod employee;
mod factory;
mod manager;

pub use activity_type::ActivityType;
pub use employee::{Employee, Lead};
pub use factory::Factory;
pub use manager::{Manager, Role};

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::ValidationError;
use crate::identity::Inn;
use crate::record::Entity;
use crate::value::FieldValue;

/// Some legacy rows carry `null` in columns the schema declares as plain
/// strings; read those as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend's create schemas require these columns as strings.
pub(crate) fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

pub(crate) fn unknown_field<E: Entity>(field: &str) -> ValidationError {
    ValidationError::UnknownField {
        kind: E::KIND,
        field: field.to_string(),
    }
}

/// Blank input clears the INN so the required check can report it.
pub(crate) fn inn_from_value(value: FieldValue) -> Result<Inn, ValidationError> {
    if value.is_blank() {
        return Ok(Inn::default());
    }
    Inn::new(value.into_text())
}

/// Re-validate an INN that may have arrived unchecked from the wire.
pub(crate) fn check_inn(inn: &Inn) -> Result<(), ValidationError> {
    Inn::new(inn.as_str()).map(|_| ())
}
