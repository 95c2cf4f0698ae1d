//! Factory contacts. Each belongs to a factory through its INN and carries
//! the factory's display name alongside.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{check_inn, inn_from_value, null_as_default, unknown_field};
use crate::error::ValidationError;
use crate::field::{ChoiceSource, FieldKind, FieldSpec};
use crate::identity::Inn;
use crate::record::{check_required, Entity};
use crate::value::FieldValue;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("inn", "Factory INN", FieldKind::Text)
        .read_only()
        .required()
        .sortable()
        .filterable(),
    FieldSpec::new("name_factory", "Factory", FieldKind::Text)
        .read_only()
        .sortable()
        .filterable(),
    FieldSpec::new("employee", "Full name", FieldKind::Text)
        .required()
        .sortable()
        .filterable(),
    FieldSpec::new("position", "Position", FieldKind::Text).nullable().filterable(),
    FieldSpec::new("phone", "Phone", FieldKind::Text).nullable(),
    FieldSpec::new("email", "Email", FieldKind::Text).nullable(),
    FieldSpec::new("comment1", "Comment 1", FieldKind::LongText).nullable(),
    FieldSpec::new("comment2", "Comment 2", FieldKind::LongText).nullable(),
    FieldSpec::new("comment3", "Comment 3", FieldKind::LongText).nullable(),
    FieldSpec::new("lead", "Lead", FieldKind::Choice(ChoiceSource::Fixed(&["+", "-"])))
        .sortable()
        .filterable(),
];

/// Whether a contact is flagged as a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lead {
    #[serde(rename = "+")]
    Yes,
    #[default]
    #[serde(rename = "-")]
    No,
}

impl Lead {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "+",
            Self::No => "-",
        }
    }

    /// The opposite flag.
    pub fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact person working at a factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub inn: Inn,
    #[serde(deserialize_with = "null_as_default")]
    pub name_factory: String,
    #[serde(deserialize_with = "null_as_default")]
    pub employee: String,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub comment1: Option<String>,
    pub comment2: Option<String>,
    pub comment3: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub lead: Lead,
}

impl Employee {
    /// An empty contact draft attached to a factory.
    pub fn for_factory(inn: Inn, name_factory: impl Into<String>) -> Self {
        Self {
            inn,
            name_factory: name_factory.into(),
            ..Self::default()
        }
    }
}

impl Entity for Employee {
    const KIND: &'static str = "employee";
    const COLLECTION: &'static str = "employees";
    const LIST_SEGMENTS: &'static [&'static str] = &["all-employees", ""];

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "inn" => FieldValue::text(self.inn.as_str()),
            "name_factory" => FieldValue::text(&self.name_factory),
            "employee" => FieldValue::text(&self.employee),
            "position" => self.position.clone().into(),
            "phone" => self.phone.clone().into(),
            "email" => self.email.clone().into(),
            "comment1" => self.comment1.clone().into(),
            "comment2" => self.comment2.clone().into(),
            "comment3" => self.comment3.clone().into(),
            "lead" => FieldValue::text(self.lead.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError> {
        match field {
            "inn" => self.inn = inn_from_value(value)?,
            "name_factory" => self.name_factory = value.into_text(),
            "employee" => self.employee = value.into_text(),
            "position" => self.position = value.into_opt_text(),
            "phone" => self.phone = value.into_opt_text(),
            "email" => self.email = value.into_opt_text(),
            "comment1" => self.comment1 = value.into_opt_text(),
            "comment2" => self.comment2 = value.into_opt_text(),
            "comment3" => self.comment3 = value.into_opt_text(),
            "lead" => {
                self.lead = match value.as_text().map(str::trim) {
                    Some("+") => Lead::Yes,
                    Some("-") | Some("") | None => Lead::No,
                    Some(other) => {
                        return Err(ValidationError::NotInList {
                            field: field.to_string(),
                            value: other.to_string(),
                            list: "+/-".to_string(),
                        })
                    }
                }
            }
            _ => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_required(self)?;
        check_inn(&self.inn)
    }

    fn title(&self) -> String {
        self.employee.clone()
    }
}
