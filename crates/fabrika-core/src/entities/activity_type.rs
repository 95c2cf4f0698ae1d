//! Activity types, the reference list behind a factory's `type_factory`.

use serde::{Deserialize, Serialize};

use super::{null_as_default, unknown_field};
use crate::error::ValidationError;
use crate::field::{FieldKind, FieldSpec};
use crate::record::Entity;
use crate::value::FieldValue;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Activity type", FieldKind::Text)
        .required()
        .sortable()
        .filterable(),
    FieldSpec::new("description", "Description", FieldKind::LongText).nullable(),
];

/// A line of business a factory can be classified under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityType {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
}

impl Entity for ActivityType {
    const KIND: &'static str = "activity type";
    const COLLECTION: &'static str = "activity-types";
    const LIST_SEGMENTS: &'static [&'static str] = &["activity-types", ""];

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(FieldValue::text(&self.name)),
            "description" => Some(self.description.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError> {
        match field {
            "name" => self.name = value.into_text(),
            "description" => self.description = value.into_opt_text(),
            _ => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }
}
