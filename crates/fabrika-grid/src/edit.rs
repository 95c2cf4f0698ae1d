//! # Cell Edit Submission
//!
//! An inline edit is applied to the grid immediately and persisted in the
//! background. The grid stages a [`PendingEdit`] (payload plus the row as it
//! was before the edit), the edit is submitted without holding the grid,
//! and the resulting [`EditOutcome`] is settled back into the grid.
//!
//! Submitting an edit to the natural-key column first probes the backend for
//! a record already holding the new value. A hit on a *different* record is
//! a conflict and nothing is written; a hit on the edited row itself is not.
//! A probe that errors leaves the edit unsaved.

use fabrika_client::{ApiError, RecordService};
use fabrika_core::{Entity, Record, RecordId};

/// An edit applied locally and awaiting persistence.
#[derive(Debug, Clone)]
pub struct PendingEdit<E> {
    field: String,
    payload: Record<E>,
    snapshot: Record<E>,
    probe_key: Option<String>,
}

impl<E: Entity> PendingEdit<E> {
    pub(crate) fn new(
        field: impl Into<String>,
        payload: Record<E>,
        snapshot: Record<E>,
        probe_key: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            payload,
            snapshot,
            probe_key,
        }
    }

    pub fn row_id(&self) -> RecordId {
        self.payload.id
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// The full record that will be written.
    pub fn payload(&self) -> &Record<E> {
        &self.payload
    }

    /// The row as it was before the edit.
    pub fn snapshot(&self) -> &Record<E> {
        &self.snapshot
    }

    /// Natural-key value to probe before writing, if the edit touches it.
    pub fn probe_key(&self) -> Option<&str> {
        self.probe_key.as_deref()
    }

    /// Probe (when needed) and write the payload.
    pub async fn submit<S>(self, service: &S) -> EditOutcome<E>
    where
        S: RecordService<E> + ?Sized,
    {
        if let Some(key) = &self.probe_key {
            match service.find_by_natural_key(key).await {
                Ok(Some(holder)) if holder.id != self.payload.id => {
                    let result = EditResult::Conflict {
                        key: key.clone(),
                        holder: holder.id,
                    };
                    return self.finish(result);
                }
                Ok(_) => {}
                Err(e) => return self.finish(EditResult::ProbeFailed(e)),
            }
        }
        let result = match service.update(&self.payload).await {
            Ok(()) => EditResult::Saved,
            Err(e) => EditResult::SaveFailed(e),
        };
        self.finish(result)
    }

    fn finish(self, result: EditResult) -> EditOutcome<E> {
        EditOutcome {
            row_id: self.payload.id,
            field: self.field,
            snapshot: self.snapshot,
            result,
        }
    }
}

/// Result of submitting a [`PendingEdit`], to be settled into the grid.
#[derive(Debug)]
pub struct EditOutcome<E> {
    pub row_id: RecordId,
    pub field: String,
    pub snapshot: Record<E>,
    pub result: EditResult,
}

#[derive(Debug)]
pub enum EditResult {
    /// The backend accepted the write.
    Saved,
    /// Another record already holds the new natural key; nothing was written.
    Conflict { key: String, holder: RecordId },
    /// The uniqueness probe itself failed; nothing was written.
    ProbeFailed(ApiError),
    /// The write was rejected or did not reach the backend.
    SaveFailed(ApiError),
}

impl EditResult {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}
