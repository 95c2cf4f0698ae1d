//! Grid error types.
//!
//! Backend failures of a mutation are not errors at this level: they are
//! reported to the host and returned as a
//! [`MutationOutcome`](crate::MutationOutcome). A [`GridError`] means the
//! caller asked for something the grid cannot do.

use fabrika_client::ApiError;
use fabrika_core::{RecordId, StateTransitionError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("no {kind} row with id {id}")]
    UnknownRow { kind: &'static str, id: RecordId },

    #[error("no create form is open")]
    NoCreateForm,

    #[error(transparent)]
    Transition(#[from] StateTransitionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to load rows: {0}")]
    Load(#[from] ApiError),
}
