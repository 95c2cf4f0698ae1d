//! Factories: the main directory record, keyed by INN.
//!
//! `manager` and `type_factory` are choice columns checked against the
//! manager and activity-type reference lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{check_inn, inn_from_value, none_as_empty, null_as_default, unknown_field};
use crate::error::ValidationError;
use crate::field::{ChoiceSource, FieldKind, FieldSpec};
use crate::identity::Inn;
use crate::record::{check_required, Entity};
use crate::reference::ReferenceKind;
use crate::value::FieldValue;

const MANAGERS: FieldKind = FieldKind::Choice(ChoiceSource::Reference(ReferenceKind::Managers));
const ACTIVITY_TYPES: FieldKind =
    FieldKind::Choice(ChoiceSource::Reference(ReferenceKind::ActivityTypes));

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("manager", "Manager", MANAGERS).required().sortable().filterable(),
    FieldSpec::new("type_factory", "Activity type", ACTIVITY_TYPES)
        .required()
        .sortable()
        .filterable(),
    FieldSpec::new("city", "City", FieldKind::Text).nullable(),
    FieldSpec::new("name", "Name", FieldKind::Text).required().filterable(),
    FieldSpec::new("inn", "INN", FieldKind::Text).required().filterable(),
    FieldSpec::new("address", "Address", FieldKind::Text),
    FieldSpec::new("n_empl", "Staff", FieldKind::Integer).nullable(),
    FieldSpec::new("okved", "OKVED", FieldKind::Text).filterable(),
    FieldSpec::new("emails", "Emails", FieldKind::Text).nullable(),
    FieldSpec::new("website", "Website", FieldKind::Text).nullable(),
    FieldSpec::new("phones", "Phones", FieldKind::Text).nullable(),
    FieldSpec::new("add_contacts", "Other contacts", FieldKind::Text).nullable(),
    FieldSpec::new("comment1", "Comment 1", FieldKind::LongText).nullable(),
    FieldSpec::new("comment2", "Comment 2", FieldKind::LongText).nullable(),
    FieldSpec::new("comment3", "Comment 3", FieldKind::LongText).nullable(),
    FieldSpec::new("comment4", "Comment 4", FieldKind::LongText).nullable(),
    FieldSpec::new("at_work", "At work", FieldKind::Text).nullable(),
    FieldSpec::new("date_in_work", "Taken into work", FieldKind::Text).nullable(),
    FieldSpec::new("date_created", "Created", FieldKind::Date)
        .read_only()
        .nullable()
        .sortable()
        .filterable(),
];

/// An enterprise in the directory, keyed naturally by its INN.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Factory {
    #[serde(deserialize_with = "null_as_default")]
    pub manager: String,
    #[serde(serialize_with = "none_as_empty")]
    pub city: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub inn: Inn,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    pub n_empl: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub okved: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_factory: String,
    pub emails: Option<String>,
    pub website: Option<String>,
    pub phones: Option<String>,
    pub add_contacts: Option<String>,
    pub comment1: Option<String>,
    pub comment2: Option<String>,
    pub comment3: Option<String>,
    pub comment4: Option<String>,
    pub at_work: Option<String>,
    pub date_in_work: Option<String>,
    pub date_created: Option<NaiveDate>,
}

impl Entity for Factory {
    const KIND: &'static str = "factory";
    const COLLECTION: &'static str = "factories";
    const LIST_SEGMENTS: &'static [&'static str] = &["all-factories", ""];
    const NATURAL_KEY: Option<&'static str> = Some("inn");

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "manager" => FieldValue::text(&self.manager),
            "type_factory" => FieldValue::text(&self.type_factory),
            "city" => self.city.clone().into(),
            "name" => FieldValue::text(&self.name),
            "inn" => FieldValue::text(self.inn.as_str()),
            "address" => FieldValue::text(&self.address),
            "n_empl" => self.n_empl.into(),
            "okved" => FieldValue::text(&self.okved),
            "emails" => self.emails.clone().into(),
            "website" => self.website.clone().into(),
            "phones" => self.phones.clone().into(),
            "add_contacts" => self.add_contacts.clone().into(),
            "comment1" => self.comment1.clone().into(),
            "comment2" => self.comment2.clone().into(),
            "comment3" => self.comment3.clone().into(),
            "comment4" => self.comment4.clone().into(),
            "at_work" => self.at_work.clone().into(),
            "date_in_work" => self.date_in_work.clone().into(),
            "date_created" => self.date_created.into(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError> {
        match field {
            "manager" => self.manager = value.into_text(),
            "type_factory" => self.type_factory = value.into_text(),
            "city" => self.city = value.into_opt_text(),
            "name" => self.name = value.into_text(),
            "inn" => self.inn = inn_from_value(value)?,
            "address" => self.address = value.into_text(),
            "n_empl" => self.n_empl = value.into_opt_integer(field)?,
            "okved" => self.okved = value.into_text(),
            "emails" => self.emails = value.into_opt_text(),
            "website" => self.website = value.into_opt_text(),
            "phones" => self.phones = value.into_opt_text(),
            "add_contacts" => self.add_contacts = value.into_opt_text(),
            "comment1" => self.comment1 = value.into_opt_text(),
            "comment2" => self.comment2 = value.into_opt_text(),
            "comment3" => self.comment3 = value.into_opt_text(),
            "comment4" => self.comment4 = value.into_opt_text(),
            "at_work" => self.at_work = value.into_opt_text(),
            "date_in_work" => self.date_in_work = value.into_opt_text(),
            "date_created" => self.date_created = value.into_opt_date(field)?,
            _ => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_required(self)?;
        check_inn(&self.inn)
    }

    fn title(&self) -> String {
        self.name.clone()
    }
}
