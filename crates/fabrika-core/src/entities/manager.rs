//! Manager accounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{null_as_default, unknown_field};
use crate::error::ValidationError;
use crate::field::{ChoiceSource, FieldKind, FieldSpec};
use crate::record::Entity;
use crate::value::FieldValue;

const ROLES: &[&str] = &["user", "admin"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("manager_name", "Manager", FieldKind::Text)
        .required()
        .sortable()
        .filterable(),
    FieldSpec::new("login", "Login", FieldKind::Text).nullable().filterable(),
    FieldSpec::new("password", "Password", FieldKind::Text).nullable(),
    FieldSpec::new("role", "Role", FieldKind::Choice(ChoiceSource::Fixed(ROLES)))
        .sortable()
        .filterable(),
    FieldSpec::new("manager_phone", "Phone", FieldKind::Text).nullable(),
    FieldSpec::new("manager_email", "Email", FieldKind::Text).nullable(),
    FieldSpec::new("manager_comment", "Comment", FieldKind::LongText).nullable(),
];

/// Access role of a manager account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sales manager. Doubles as a login account.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manager {
    #[serde(deserialize_with = "null_as_default")]
    pub manager_name: String,
    pub login: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role: Role,
    pub manager_phone: Option<String>,
    pub manager_email: Option<String>,
    pub manager_comment: Option<String>,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("manager_name", &self.manager_name)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("role", &self.role)
            .field("manager_phone", &self.manager_phone)
            .field("manager_email", &self.manager_email)
            .field("manager_comment", &self.manager_comment)
            .finish()
    }
}

impl Entity for Manager {
    const KIND: &'static str = "manager";
    const COLLECTION: &'static str = "managers";
    const LIST_SEGMENTS: &'static [&'static str] = &["managers", ""];

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        let value = match field {
            "manager_name" => FieldValue::text(&self.manager_name),
            "login" => self.login.clone().into(),
            "password" => self.password.clone().into(),
            "role" => FieldValue::text(self.role.as_str()),
            "manager_phone" => self.manager_phone.clone().into(),
            "manager_email" => self.manager_email.clone().into(),
            "manager_comment" => self.manager_comment.clone().into(),
            _ => return None,
        };
        Some(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError> {
        match field {
            "manager_name" => self.manager_name = value.into_text(),
            "login" => self.login = value.into_opt_text(),
            "password" => self.password = value.into_opt_text(),
            "role" => {
                self.role = match value.as_text().map(str::trim) {
                    Some("admin") => Role::Admin,
                    Some("user") | Some("") | None => Role::User,
                    Some(other) => {
                        return Err(ValidationError::NotInList {
                            field: field.to_string(),
                            value: other.to_string(),
                            list: ROLES.join("/"),
                        })
                    }
                }
            }
            "manager_phone" => self.manager_phone = value.into_opt_text(),
            "manager_email" => self.manager_email = value.into_opt_text(),
            "manager_comment" => self.manager_comment = value.into_opt_text(),
            _ => return Err(unknown_field::<Self>(field)),
        }
        Ok(())
    }
}
