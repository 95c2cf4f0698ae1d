//! # Field Specifications
//!
//! Each entity declares a static table of [`FieldSpec`]s describing its
//! columns: display label, value domain, whether the cell can be edited
//! inline, whether it must be filled on create, and whether it takes part in
//! sorted or filtered views.
//!
//! Raw operator input (a CLI argument, a text cell) is turned into a typed
//! [`FieldValue`] by [`FieldSpec::parse_value`], then checked against the
//! field's domain and any loaded reference list by [`FieldSpec::check_value`].

use crate::error::ValidationError;
use crate::reference::{ReferenceKind, ReferenceLists};
use crate::value::{mismatch, FieldValue};

/// Where an enumerated-choice field takes its allowed values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    /// A reference list fetched from the backend at session start.
    Reference(ReferenceKind),
    /// A list fixed at compile time.
    Fixed(&'static [&'static str]),
}

/// Value domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line free text.
    Text,
    /// Multi-line free text (comments, descriptions).
    LongText,
    /// Whole number.
    Integer,
    /// Calendar date, `YYYY-MM-DD` on input.
    Date,
    /// One value out of an enumerated list.
    Choice(ChoiceSource),
}

impl FieldKind {
    /// Short name of the domain, used in listings and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "long text",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::Choice(_) => "choice",
        }
    }
}

/// Static description of one column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire and addressing name (e.g. `"inn"`).
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Value domain.
    pub kind: FieldKind,
    /// Whether the cell may be edited inline.
    pub editable: bool,
    /// Whether an empty input is stored as null.
    pub nullable: bool,
    /// Whether the field must be non-blank on create.
    pub required: bool,
    /// Whether sorted views may order by this field.
    pub sortable: bool,
    /// Whether filtered views may match on this field.
    pub filterable: bool,
}

impl FieldSpec {
    /// An editable, non-nullable, optional field that is neither sorted nor
    /// filtered. Refine with the builder methods below.
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            editable: true,
            nullable: false,
            required: false,
            sortable: false,
            filterable: false,
        }
    }

    /// Mark the field as not editable inline.
    pub const fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Store empty input as null.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Require a non-blank value on create.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allow sorting on this field.
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Allow filtering on this field.
    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Parse raw operator input into a value of this field's domain.
    ///
    /// Blank input on a nullable field becomes [`FieldValue::Null`]; blank
    /// input elsewhere becomes empty text and is left to the required check.
    pub fn parse_value(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        if raw.trim().is_empty() {
            return Ok(if self.nullable || !self.is_textual() {
                FieldValue::Null
            } else {
                FieldValue::text("")
            });
        }
        match self.kind {
            FieldKind::Integer => FieldValue::text(raw)
                .into_opt_integer(self.name)
                .map(FieldValue::from),
            FieldKind::Date => FieldValue::text(raw).into_opt_date(self.name).map(FieldValue::from),
            FieldKind::Text | FieldKind::LongText | FieldKind::Choice(_) => {
                Ok(FieldValue::text(raw.trim()))
            }
        }
    }

    /// Normalise a value into this field's domain. Text is parsed the same
    /// way as raw input; typed values pass through.
    pub fn coerce(&self, value: FieldValue) -> Result<FieldValue, ValidationError> {
        match value {
            FieldValue::Text(raw) => self.parse_value(&raw),
            other => Ok(other),
        }
    }

    /// Check a value against this field's domain.
    ///
    /// Enumerated choices backed by a reference list are only checked when
    /// the list has been loaded into `refs`.
    pub fn check_value(
        &self,
        value: &FieldValue,
        refs: &ReferenceLists,
    ) -> Result<(), ValidationError> {
        if self.required && value.is_blank() {
            return Err(ValidationError::MissingRequired(self.name.to_string()));
        }
        if value.is_null() {
            return Ok(());
        }
        match (self.kind, value) {
            (FieldKind::Integer, FieldValue::Integer(_)) => Ok(()),
            (FieldKind::Date, FieldValue::Date(_)) => Ok(()),
            (FieldKind::Text | FieldKind::LongText, FieldValue::Text(_)) => Ok(()),
            (FieldKind::Choice(source), FieldValue::Text(v)) => {
                if v.trim().is_empty() {
                    return Ok(());
                }
                match source {
                    ChoiceSource::Fixed(options) => {
                        if options.iter().any(|o| *o == v.as_str()) {
                            Ok(())
                        } else {
                            Err(not_in_list(self.name, v, &options.join("/")))
                        }
                    }
                    ChoiceSource::Reference(kind) => match refs.contains(kind, v) {
                        Some(false) => Err(not_in_list(self.name, v, kind.as_str())),
                        Some(true) | None => Ok(()),
                    },
                }
            }
            (kind, other) => Err(mismatch(self.name, kind.as_str(), &other.to_string())),
        }
    }

    fn is_textual(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Text | FieldKind::LongText | FieldKind::Choice(_)
        )
    }
}

fn not_in_list(field: &str, value: &str, list: &str) -> ValidationError {
    ValidationError::NotInList {
        field: field.to_string(),
        value: value.to_string(),
        list: list.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceList;

    const NAME: FieldSpec = FieldSpec::new("name", "Name", FieldKind::Text).required();
    const CITY: FieldSpec = FieldSpec::new("city", "City", FieldKind::Text).nullable();
    const STAFF: FieldSpec = FieldSpec::new("n_empl", "Staff", FieldKind::Integer).nullable();
    const ROLE: FieldSpec =
        FieldSpec::new("role", "Role", FieldKind::Choice(ChoiceSource::Fixed(&["user", "admin"])));
    const MANAGER: FieldSpec = FieldSpec::new(
        "manager",
        "Manager",
        FieldKind::Choice(ChoiceSource::Reference(ReferenceKind::Managers)),
    );

    #[test]
    fn builder_flags() {
        let spec = FieldSpec::new("date_created", "Created", FieldKind::Date)
            .read_only()
            .nullable()
            .sortable()
            .filterable();
        assert!(!spec.editable);
        assert!(spec.nullable && spec.sortable && spec.filterable);
        assert!(!spec.required);
    }

    #[test]
    fn blank_input_on_nullable_field_is_null() {
        assert_eq!(CITY.parse_value("  ").unwrap(), FieldValue::Null);
        assert_eq!(STAFF.parse_value("").unwrap(), FieldValue::Null);
    }

    #[test]
    fn blank_input_on_required_text_fails_check() {
        let v = NAME.parse_value("").unwrap();
        assert_eq!(v, FieldValue::text(""));
        assert_eq!(
            NAME.check_value(&v, &ReferenceLists::default()),
            Err(ValidationError::MissingRequired("name".to_string()))
        );
    }

    #[test]
    fn integer_parse_rejects_text() {
        assert_eq!(STAFF.parse_value("120").unwrap(), FieldValue::Integer(120));
        assert!(STAFF.parse_value("a lot").is_err());
    }

    #[test]
    fn coerce_parses_text_for_typed_fields() {
        assert_eq!(STAFF.coerce(FieldValue::text("7")).unwrap(), FieldValue::Integer(7));
        assert_eq!(STAFF.coerce(FieldValue::Integer(7)).unwrap(), FieldValue::Integer(7));
        assert_eq!(CITY.coerce(FieldValue::text(" Казань ")).unwrap(), FieldValue::text("Казань"));
    }

    #[test]
    fn check_rejects_wrong_domain() {
        let err = STAFF
            .check_value(&FieldValue::text("ten"), &ReferenceLists::default())
            .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn fixed_choice_is_enforced() {
        let refs = ReferenceLists::default();
        assert!(ROLE.check_value(&FieldValue::text("admin"), &refs).is_ok());
        assert!(matches!(
            ROLE.check_value(&FieldValue::text("root"), &refs),
            Err(ValidationError::NotInList { .. })
        ));
    }

    #[test]
    fn reference_choice_checked_only_when_loaded() {
        let empty = ReferenceLists::default();
        assert!(MANAGER.check_value(&FieldValue::text("Anyone"), &empty).is_ok());

        let mut refs = ReferenceLists::default();
        refs.insert(ReferenceList::new(
            ReferenceKind::Managers,
            vec!["Иванов".to_string(), "Петров".to_string()],
        ));
        assert!(MANAGER.check_value(&FieldValue::text("Петров"), &refs).is_ok());
        assert!(MANAGER.check_value(&FieldValue::text("Сидоров"), &refs).is_err());
    }
}
