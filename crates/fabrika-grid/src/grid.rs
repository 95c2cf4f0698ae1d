//! # Editable Record Grid
//!
//! Holds the rows of one entity collection and mediates every mutation
//! between the operator and a [`RecordService`].
//!
//! ## Protocol
//!
//! - **Load** replaces all rows with the backend's collection. On failure
//!   the grid shows the error state and keeps the rows it had.
//! - **Edit** is optimistic: the cell changes immediately, the full record is
//!   written in the background, and success needs no reload. Edits to the
//!   natural-key column are probed for uniqueness first.
//! - **Create** validates the draft, probes the natural key, and only then
//!   posts. A taken key is reported and nothing is sent; the form stays open
//!   with everything the operator typed.
//! - **Delete** asks the host to confirm, then removes the row once the
//!   backend agrees.
//!
//! Every failed mutation is reported to the host, then reconciled according
//! to the grid's [`ReconcilePolicy`]. The backend error behind the most
//! recent failure is kept until [`take_last_error`] collects it, so callers
//! can react to a rejected session.
//!
//! [`take_last_error`]: EditableRecordGrid::take_last_error

use fabrika_client::{ApiError, RecordService};
use fabrika_core::{Entity, FieldValue, Record, RecordId, ReferenceLists, ValidationError};
use tracing::{debug, info, warn};

use crate::edit::{EditOutcome, EditResult, PendingEdit};
use crate::error::GridError;
use crate::host::{GridHost, Notice, NoticeKind};
use crate::state::{GridMachine, GridState};
use crate::view::ViewOptions;

/// How a failed mutation is reconciled with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Reload the whole collection.
    #[default]
    Resync,
    /// Restore the edited row from its pre-edit snapshot. Delete and create
    /// failures leave the rows as they are.
    RollbackRow,
}

/// What a mutation ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend accepted the change.
    Applied,
    /// The natural key is held by another record; nothing was written.
    Conflict,
    /// The backend rejected the change or could not be reached.
    Failed,
    /// The operator declined the confirmation.
    Cancelled,
    /// Client-side validation failed; nothing was sent.
    Invalid,
}

pub struct EditableRecordGrid<E, S, H> {
    service: S,
    host: H,
    rows: Vec<Record<E>>,
    machine: GridMachine,
    policy: ReconcilePolicy,
    references: ReferenceLists,
    create_form: Option<E>,
    last_error: Option<ApiError>,
}

impl<E, S, H> EditableRecordGrid<E, S, H>
where
    E: Entity,
    S: RecordService<E>,
    H: GridHost,
{
    /// An empty grid in the `Loading` state. Call [`load`](Self::load) next.
    pub fn new(service: S, host: H) -> Self {
        Self {
            service,
            host,
            rows: Vec::new(),
            machine: GridMachine::new(),
            policy: ReconcilePolicy::default(),
            references: ReferenceLists::default(),
            create_form: None,
            last_error: None,
        }
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reference lists that constrain choice columns.
    pub fn with_references(mut self, references: ReferenceLists) -> Self {
        self.references = references;
        self
    }

    pub fn set_references(&mut self, references: ReferenceLists) {
        self.references = references;
    }

    pub fn references(&self) -> &ReferenceLists {
        &self.references
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> &GridState {
        self.machine.state()
    }

    pub fn machine(&self) -> &GridMachine {
        &self.machine
    }

    /// The backend error from the latest failed mutation or resync, if it
    /// has not been collected yet.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<ApiError> {
        self.last_error.take()
    }

    /// Rows in backend order.
    pub fn rows(&self) -> &[Record<E>] {
        &self.rows
    }

    pub fn row(&self, id: RecordId) -> Option<&Record<E>> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Filtered and sorted rows.
    pub fn view(&self, options: &ViewOptions) -> Result<Vec<&Record<E>>, ValidationError> {
        options.apply(&self.rows)
    }

    // ── Load ─────────────────────────────────────────────────────────

    /// Replace all rows with the backend's collection.
    ///
    /// Returns the number of rows loaded. On failure the grid enters the
    /// error state and previously loaded rows are kept.
    pub async fn load(&mut self) -> Result<usize, GridError> {
        self.machine.begin_load()?;
        match self.service.list().await {
            Ok(rows) => {
                self.rows = rows;
                self.machine.finish_load();
                debug!(kind = E::KIND, rows = self.rows.len(), "rows loaded");
                Ok(self.rows.len())
            }
            Err(e) => {
                warn!(kind = E::KIND, error = %e, "load failed");
                self.machine.fail_load(e.user_message());
                Err(GridError::Load(e))
            }
        }
    }

    async fn resync(&mut self) {
        match self.load().await {
            Ok(_) => {}
            Err(GridError::Load(e)) => {
                debug!(kind = E::KIND, error = %e, "resync did not complete");
                self.last_error = Some(e);
            }
            Err(e) => debug!(kind = E::KIND, error = %e, "resync did not complete"),
        }
    }

    // ── Edit ─────────────────────────────────────────────────────────

    /// Apply an edit locally and return it for submission.
    ///
    /// Nothing changes when the value is rejected.
    pub fn stage_edit(
        &mut self,
        row_id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<PendingEdit<E>, GridError> {
        let idx = self.index_of(row_id)?;
        let snapshot = self.rows[idx].clone();
        let mut data = snapshot.data.clone();
        data.apply_edit(field, value, &self.references)?;
        self.machine.begin_edit()?;

        let probe_key = if E::NATURAL_KEY == Some(field) {
            data.natural_key()
        } else {
            None
        };
        self.rows[idx].data = data;
        Ok(PendingEdit::new(field, self.rows[idx].clone(), snapshot, probe_key))
    }

    /// Fold a submitted edit back into the grid.
    pub async fn settle_edit(&mut self, outcome: EditOutcome<E>) -> MutationOutcome {
        self.machine.end_edit();
        let EditOutcome {
            row_id,
            field,
            snapshot,
            result,
        } = outcome;

        let (notice, mutation) = match result {
            EditResult::Saved => {
                info!(kind = E::KIND, id = %row_id, field = %field, "saved");
                return MutationOutcome::Applied;
            }
            EditResult::Conflict { key, holder } => {
                let field_label = E::field_spec(&field).map_or(field.as_str(), |s| s.label);
                let message = format!(
                    "A {} with {} {} already exists (record {}).",
                    E::KIND,
                    field_label,
                    key,
                    holder
                );
                (Notice::new(NoticeKind::Conflict, message), MutationOutcome::Conflict)
            }
            EditResult::ProbeFailed(e) | EditResult::SaveFailed(e) => {
                warn!(kind = E::KIND, id = %row_id, field = %field, error = %e, "save failed");
                let notice = Notice::new(NoticeKind::SaveFailed, e.user_message());
                self.last_error = Some(e);
                (notice, MutationOutcome::Failed)
            }
        };
        self.host.notify(&notice);
        self.reconcile_row(snapshot).await;
        mutation
    }

    /// Stage, submit and settle one edit.
    ///
    /// A rejected value is reported to the host and yields
    /// [`MutationOutcome::Invalid`] without contacting the backend.
    pub async fn edit_cell(
        &mut self,
        row_id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<MutationOutcome, GridError> {
        let pending = match self.stage_edit(row_id, field, value) {
            Ok(pending) => pending,
            Err(GridError::Validation(e)) => {
                self.host.notify(&Notice::new(NoticeKind::Validation, e.to_string()));
                return Ok(MutationOutcome::Invalid);
            }
            Err(e) => return Err(e),
        };
        let outcome = pending.submit(&self.service).await;
        Ok(self.settle_edit(outcome).await)
    }

    async fn reconcile_row(&mut self, snapshot: Record<E>) {
        match self.policy {
            ReconcilePolicy::Resync => self.resync().await,
            ReconcilePolicy::RollbackRow => {
                if let Some(row) = self.rows.iter_mut().find(|r| r.id == snapshot.id) {
                    *row = snapshot;
                }
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Confirm with the host, then delete the row.
    pub async fn delete_row(&mut self, row_id: RecordId) -> Result<MutationOutcome, GridError> {
        let idx = self.index_of(row_id)?;
        let prompt = format!("Delete {} \"{}\"?", E::KIND, self.rows[idx].data.title());
        self.machine.begin_delete(row_id)?;

        if !self.host.confirm(&prompt) {
            self.machine.end_delete();
            debug!(kind = E::KIND, id = %row_id, "delete cancelled");
            return Ok(MutationOutcome::Cancelled);
        }

        let result = self.service.delete(row_id).await;
        self.machine.end_delete();
        match result {
            Ok(()) => {
                self.rows.retain(|r| r.id != row_id);
                info!(kind = E::KIND, id = %row_id, "deleted");
                Ok(MutationOutcome::Applied)
            }
            Err(e) => {
                warn!(kind = E::KIND, id = %row_id, error = %e, "delete failed");
                self.host
                    .notify(&Notice::new(NoticeKind::DeleteFailed, e.user_message()));
                self.last_error = Some(e);
                self.reconcile_collection().await;
                Ok(MutationOutcome::Failed)
            }
        }
    }

    async fn reconcile_collection(&mut self) {
        if self.policy == ReconcilePolicy::Resync {
            self.resync().await;
        }
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Open the create form with a prefilled draft, replacing any open form.
    pub fn open_create(&mut self, draft: E) {
        self.create_form = Some(draft);
    }

    /// The open create form, if any.
    pub fn create_form(&self) -> Option<&E> {
        self.create_form.as_ref()
    }

    /// Set one field of the create form, opening an empty form if needed.
    pub fn fill_create_field(&mut self, field: &str, value: FieldValue) -> Result<(), ValidationError> {
        let form = self.create_form.get_or_insert_with(E::default);
        form.apply_draft(field, value, &self.references)
    }

    /// Close the create form and discard its contents.
    pub fn cancel_create(&mut self) {
        self.create_form = None;
    }

    /// Open the form with `draft` and submit it.
    pub async fn create_row(&mut self, draft: E) -> Result<MutationOutcome, GridError> {
        self.open_create(draft);
        self.submit_create().await
    }

    /// Submit the open create form.
    ///
    /// On success the new row is appended and the form closes. On any other
    /// outcome the form stays open and unchanged.
    pub async fn submit_create(&mut self) -> Result<MutationOutcome, GridError> {
        let draft = self.create_form.clone().ok_or(GridError::NoCreateForm)?;
        self.machine.begin_create()?;
        let outcome = self.submit_draft(&draft).await;
        self.machine.end_create();

        match outcome {
            Ok(record) => {
                info!(kind = E::KIND, id = %record.id, "created");
                self.rows.push(record);
                self.create_form = None;
                Ok(MutationOutcome::Applied)
            }
            Err(CreateRejected::Invalid(e)) => {
                self.host.notify(&Notice::new(NoticeKind::Validation, e.to_string()));
                Ok(MutationOutcome::Invalid)
            }
            Err(CreateRejected::Taken { key, holder }) => {
                let label = E::NATURAL_KEY
                    .and_then(|f| E::field_spec(f).ok())
                    .map_or("key", |s| s.label);
                let message = format!(
                    "A {} with {} {} already exists (record {}).",
                    E::KIND,
                    label,
                    key,
                    holder
                );
                self.host.notify(&Notice::new(NoticeKind::Conflict, message));
                Ok(MutationOutcome::Conflict)
            }
            Err(CreateRejected::Backend(e)) => {
                warn!(kind = E::KIND, error = %e, "create failed");
                self.host
                    .notify(&Notice::new(NoticeKind::CreateFailed, e.user_message()));
                self.last_error = Some(e);
                self.reconcile_collection().await;
                Ok(MutationOutcome::Failed)
            }
        }
    }

    async fn submit_draft(&self, draft: &E) -> Result<Record<E>, CreateRejected> {
        draft.validate().map_err(CreateRejected::Invalid)?;
        if let Some(key) = draft.natural_key() {
            let holder = self
                .service
                .find_by_natural_key(&key)
                .await
                .map_err(CreateRejected::Backend)?;
            if let Some(holder) = holder {
                return Err(CreateRejected::Taken {
                    key,
                    holder: holder.id,
                });
            }
        }
        self.service.create(draft).await.map_err(CreateRejected::Backend)
    }

    fn index_of(&self, id: RecordId) -> Result<usize, GridError> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(GridError::UnknownRow { kind: E::KIND, id })
    }
}

enum CreateRejected {
    Invalid(ValidationError),
    Taken { key: String, holder: RecordId },
    Backend(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::memory::{MemoryService, Operation};
    use fabrika_core::ActivityType;

    fn activity(id: i64, name: &str) -> Record<ActivityType> {
        Record::new(
            RecordId::new(id),
            ActivityType {
                name: name.to_string(),
                description: None,
            },
        )
    }

    async fn loaded(
        records: Vec<Record<ActivityType>>,
    ) -> EditableRecordGrid<ActivityType, MemoryService<ActivityType>, RecordingHost> {
        let mut grid = EditableRecordGrid::new(
            MemoryService::with_records(records),
            RecordingHost::confirming(),
        );
        grid.load().await.unwrap();
        grid
    }

    #[tokio::test]
    async fn edit_unknown_row_is_an_error() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")]).await;
        let err = grid
            .edit_cell(RecordId::new(9), "name", FieldValue::text("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, GridError::UnknownRow { .. }));
    }

    #[tokio::test]
    async fn rejected_value_changes_nothing() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")]).await;
        let outcome = grid
            .edit_cell(RecordId::new(1), "name", FieldValue::text("  "))
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Invalid);
        assert_eq!(grid.rows()[0].data.name, "ХИМИЯ");
        assert_eq!(grid.service().count(Operation::Update), 0);
        assert!(grid.state().is_ready());
    }

    #[tokio::test]
    async fn rollback_policy_restores_the_row_without_reloading() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")])
            .await
            .with_policy(ReconcilePolicy::RollbackRow);
        grid.service().fail_next(Operation::Update, 500);
        let outcome = grid
            .edit_cell(RecordId::new(1), "name", FieldValue::text("МЕТАЛЛ"))
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Failed);
        assert_eq!(grid.rows()[0].data.name, "ХИМИЯ");
        assert_eq!(grid.service().count(Operation::List), 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_error_for_the_caller() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")]).await;
        grid.service().fail_next(Operation::Update, 401);
        let outcome = grid
            .edit_cell(RecordId::new(1), "name", FieldValue::text("МЕТАЛЛ"))
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Failed);
        assert!(matches!(
            grid.take_last_error(),
            Some(ApiError::Unauthorized { .. })
        ));
        assert!(grid.last_error().is_none());
    }

    #[tokio::test]
    async fn failed_resync_replaces_the_mutation_error() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")]).await;
        grid.service().fail_next(Operation::Delete, 500);
        grid.service().fail_always(Operation::List, 401);
        let outcome = grid.delete_row(RecordId::new(1)).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Failed);
        assert!(grid.state().is_error());
        assert!(matches!(
            grid.last_error(),
            Some(ApiError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn applied_edit_leaves_no_error() {
        let mut grid = loaded(vec![activity(1, "ХИМИЯ")]).await;
        grid.edit_cell(RecordId::new(1), "name", FieldValue::text("МЕТАЛЛ"))
            .await
            .unwrap();
        assert!(grid.last_error().is_none());
    }

    #[tokio::test]
    async fn submit_without_form_is_an_error() {
        let mut grid = loaded(vec![]).await;
        assert!(matches!(
            grid.submit_create().await,
            Err(GridError::NoCreateForm)
        ));
    }

    #[tokio::test]
    async fn fill_create_field_opens_a_form() {
        let mut grid = loaded(vec![]).await;
        grid.fill_create_field("name", FieldValue::text("ХИМИЯ")).unwrap();
        assert_eq!(grid.create_form().unwrap().name, "ХИМИЯ");
        let outcome = grid.submit_create().await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        assert!(grid.create_form().is_none());
        assert_eq!(grid.rows().len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_is_not_posted() {
        let mut grid = loaded(vec![]).await;
        let outcome = grid.create_row(ActivityType::default()).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Invalid);
        assert_eq!(grid.service().count(Operation::Create), 0);
        assert!(grid.create_form().is_some());
        assert_eq!(grid.host().notices()[0].kind, NoticeKind::Validation);
    }
}
