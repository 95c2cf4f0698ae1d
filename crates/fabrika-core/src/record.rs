//! # Records and the Entity Trait
//!
//! An entity is a plain struct of named fields (a factory, an employee, a
//! manager, an activity type). The backend persists it with a numeric
//! identifier; [`Record<E>`] is that persisted form, with the entity fields
//! flattened next to `id` on the wire. The bare entity struct is the
//! creation draft.
//!
//! [`Entity`] describes the collection an entity lives in, its field table,
//! and by-name cell access. Everything generic over entities (the HTTP
//! collection client, the editable grid, the CLI) is written against it.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::FieldSpec;
use crate::identity::RecordId;
use crate::reference::ReferenceLists;
use crate::value::FieldValue;

/// A directory entity with a declared field table and REST collection.
pub trait Entity:
    Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable kind, used in logs and messages (e.g. `"factory"`).
    const KIND: &'static str;

    /// Path segment of the collection for by-id and create requests.
    const COLLECTION: &'static str;

    /// Path segments of the unpaginated list endpoint. A trailing empty
    /// segment yields a trailing slash.
    const LIST_SEGMENTS: &'static [&'static str];

    /// Field that must be unique across the collection, if any.
    const NATURAL_KEY: Option<&'static str> = None;

    /// The static field table.
    fn fields() -> &'static [FieldSpec];

    /// Read a field by name. `None` for an unknown name.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Write a field by name, coercing the value into the field's type.
    ///
    /// This is the raw setter: editability and reference lists are not
    /// consulted. Use [`Entity::apply_edit`] or [`Entity::apply_draft`].
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError>;

    /// Look up a field specification by name.
    fn field_spec(name: &str) -> Result<&'static FieldSpec, ValidationError> {
        Self::fields()
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ValidationError::UnknownField {
                kind: Self::KIND,
                field: name.to_string(),
            })
    }

    /// Apply an inline cell edit: the field must exist, be editable, and the
    /// value must fit its domain and reference list.
    fn apply_edit(
        &mut self,
        field: &str,
        value: FieldValue,
        refs: &ReferenceLists,
    ) -> Result<(), ValidationError> {
        let spec = Self::field_spec(field)?;
        if !spec.editable {
            return Err(ValidationError::ReadOnlyField(field.to_string()));
        }
        let value = spec.coerce(value)?;
        spec.check_value(&value, refs)?;
        self.set(field, value)
    }

    /// Fill a field of a creation draft. Read-only columns may be set here
    /// since they are only read-only once the record exists.
    fn apply_draft(
        &mut self,
        field: &str,
        value: FieldValue,
        refs: &ReferenceLists,
    ) -> Result<(), ValidationError> {
        let spec = Self::field_spec(field)?;
        let value = spec.coerce(value)?;
        if !value.is_blank() {
            spec.check_value(&value, refs)?;
        }
        self.set(field, value)
    }

    /// Validate a draft before submission. Checks required fields by default.
    fn validate(&self) -> Result<(), ValidationError> {
        check_required(self)
    }

    /// Current value of the natural key, if the entity declares one and it
    /// is not blank.
    fn natural_key(&self) -> Option<String> {
        let field = Self::NATURAL_KEY?;
        self.get(field)
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string().trim().to_string())
    }

    /// Short label for prompts: the first required field's value.
    fn title(&self) -> String {
        Self::fields()
            .iter()
            .find(|f| f.required)
            .and_then(|f| self.get(f.name))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// Fail with the first required field that is blank.
pub fn check_required<E: Entity>(entity: &E) -> Result<(), ValidationError> {
    for spec in E::fields().iter().filter(|f| f.required) {
        let blank = entity.get(spec.name).map_or(true, |v| v.is_blank());
        if blank {
            return Err(ValidationError::MissingRequired(spec.name.to_string()));
        }
    }
    Ok(())
}

/// A persisted entity: backend identifier plus the entity's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "E: Entity")]
pub struct Record<E> {
    /// Backend-assigned identifier, stable for the record's lifetime.
    pub id: RecordId,
    /// Field values.
    #[serde(flatten)]
    pub data: E,
}

impl<E: Entity> Record<E> {
    /// Pair an identifier with entity data.
    pub fn new(id: RecordId, data: E) -> Self {
        Self { id, data }
    }

    /// Read a field by name, including the synthetic `id` column.
    pub fn get(&self, field: &str) -> Option<FieldValue> {
        if field == "id" {
            return Some(FieldValue::Integer(self.id.get()));
        }
        self.data.get(field)
    }
}
