//! # Field Values
//!
//! [`FieldValue`] is the scalar carried by a single grid cell. Entities
//! convert their typed fields to and from it when a cell is read or written
//! by name; the conversion helpers here do the per-domain coercion.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (nullable column left empty).
    Null,
    /// Free or enumerated text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Calendar date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Whether this is [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Integer(_) | Self::Date(_) => false,
        }
    }

    /// Borrow the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Ordering used by sorted views: null sorts first, values of the same
    /// domain compare naturally, mixed domains compare by rendered text.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }

    /// Case-insensitive substring match against the rendered value.
    ///
    /// `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.to_string().to_lowercase().contains(needle)
    }

    /// Coerce into a non-nullable text field. Null becomes the empty string.
    pub fn into_text(self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s,
            other => other.to_string(),
        }
    }

    /// Coerce into a nullable text field.
    pub fn into_opt_text(self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Coerce into a nullable integer field, parsing text input.
    pub fn into_opt_integer(self, field: &str) -> Result<Option<i64>, ValidationError> {
        match self {
            Self::Null => Ok(None),
            Self::Integer(i) => Ok(Some(i)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s.trim().parse().map(Some).map_err(|_| mismatch(field, "an integer", &s)),
            Self::Date(d) => Err(mismatch(field, "an integer", &d.to_string())),
        }
    }

    /// Coerce into a nullable date field, parsing `YYYY-MM-DD` text input.
    pub fn into_opt_date(self, field: &str) -> Result<Option<NaiveDate>, ValidationError> {
        match self {
            Self::Null => Ok(None),
            Self::Date(d) => Ok(Some(d)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(|_| mismatch(field, "a date (YYYY-MM-DD)", &s)),
            Self::Integer(i) => Err(mismatch(field, "a date (YYYY-MM-DD)", &i.to_string())),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(s: Option<String>) -> Self {
        s.map_or(Self::Null, Self::Text)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(i: Option<i64>) -> Self {
        i.map_or(Self::Null, Self::Integer)
    }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map_or(Self::Null, Self::Date)
    }
}

pub(crate) fn mismatch(field: &str, expected: &'static str, value: &str) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sorts_before_everything() {
        assert_eq!(FieldValue::Null.sort_cmp(&FieldValue::text("a")), Ordering::Less);
        assert_eq!(FieldValue::Integer(1).sort_cmp(&FieldValue::Null), Ordering::Greater);
    }

    #[test]
    fn integers_sort_numerically() {
        assert_eq!(FieldValue::Integer(9).sort_cmp(&FieldValue::Integer(10)), Ordering::Less);
    }

    #[test]
    fn text_sorts_case_insensitively() {
        assert_eq!(
            FieldValue::text("apple").sort_cmp(&FieldValue::text("Banana")),
            Ordering::Less
        );
    }

    #[test]
    fn integer_coercion_parses_text() {
        assert_eq!(FieldValue::text(" 15 ").into_opt_integer("n_empl").unwrap(), Some(15));
        assert_eq!(FieldValue::text("").into_opt_integer("n_empl").unwrap(), None);
        assert!(FieldValue::text("many").into_opt_integer("n_empl").is_err());
    }

    #[test]
    fn date_coercion_parses_iso_text() {
        let d = FieldValue::text("2025-03-01").into_opt_date("date_created").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(FieldValue::text("01.03.2025").into_opt_date("date_created").is_err());
    }

    #[test]
    fn null_renders_empty_and_serializes_null() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&FieldValue::Integer(3)).unwrap(), "3");
    }

    #[test]
    fn blank_detection() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::text("  ").is_blank());
        assert!(!FieldValue::Integer(0).is_blank());
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(FieldValue::text("ООО Химпром").contains_lowercase("химпром"));
        assert!(FieldValue::Integer(1250).contains_lowercase("25"));
    }
}
