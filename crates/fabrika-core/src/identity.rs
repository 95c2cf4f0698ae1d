//! # Identity Newtypes
//!
//! [`RecordId`] is the opaque numeric identifier the backend assigns to every
//! persisted record. [`Inn`] is the Russian taxpayer identification number,
//! the natural key of a factory.
//!
//! ## Validation
//!
//! `RecordId` is always valid by construction. `Inn` validates at
//! construction: it must be a non-empty run of ASCII digits once surrounding
//! whitespace is trimmed. Deserialization is transparent so rows coming back
//! from the backend are never rejected on read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Backend-assigned identifier of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw backend identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Taxpayer identification number (ИНН), unique across factories.
///
/// `Default` yields an empty value so that a creation draft can start blank;
/// an empty INN never passes [`Inn::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inn(String);

impl Inn {
    /// Create an INN from a string, validating format.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = s.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidInn(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Access the INN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value is blank (only possible for a fresh draft).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Inn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
