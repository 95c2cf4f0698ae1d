//! # Error Hierarchy
//!
//! Structured error types shared by the directory crates, built with
//! `thiserror`. Each variant carries the field name or input that failed so a
//! notification can tell the operator exactly what to correct.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures for field values, drafts, and identifiers.
///
/// These are the "validation failure" class of errors: they are detected
/// client-side before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The record kind has no field with this name.
    #[error("unknown field \"{field}\" for {kind}")]
    UnknownField {
        /// Human-readable record kind (e.g. "factory").
        kind: &'static str,
        /// The field name that was requested.
        field: String,
    },

    /// The field exists but cannot be edited inline.
    #[error("field \"{0}\" is read-only")]
    ReadOnlyField(String),

    /// A field marked required was left blank.
    #[error("required field \"{0}\" is empty")]
    MissingRequired(String),

    /// The value does not fit the field's value domain.
    #[error("field \"{field}\" expects {expected}, got \"{value}\"")]
    TypeMismatch {
        /// The field being assigned.
        field: String,
        /// Description of the accepted domain.
        expected: &'static str,
        /// The rejected input, rendered as text.
        value: String,
    },

    /// An enumerated-choice value is not a member of its list.
    #[error("value \"{value}\" for field \"{field}\" is not in the {list} list")]
    NotInList {
        /// The field being assigned.
        field: String,
        /// The rejected value.
        value: String,
        /// Name of the list the value was checked against.
        list: String,
    },

    /// Tax identification number is empty or not made of digits.
    #[error("invalid INN: \"{0}\" (expected a non-empty string of digits)")]
    InvalidInn(String),

    /// A sort was requested on a field that does not participate in sorting.
    #[error("field \"{0}\" is not sortable")]
    NotSortable(String),

    /// A filter was requested on a field that does not participate in filtering.
    #[error("field \"{0}\" is not filterable")]
    NotFilterable(String),

    /// A date range whose start lies after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Inclusive lower bound.
        start: NaiveDate,
        /// Inclusive upper bound.
        end: NaiveDate,
    },
}

/// Errors during grid state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The attempted transition is not valid from the current state.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current state name.
        from: &'static str,
        /// The attempted target state name.
        to: &'static str,
        /// Human-readable reason for the rejection.
        reason: String,
    },
}
