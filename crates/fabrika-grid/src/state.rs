//! # Grid State Machine
//!
//! Display state of one editable grid.
//!
//! ## States
//!
//! ```text
//! Loading ──▶ Ready ⇄ Editing { in_flight }
//!    │          ├──▶ SubmittingCreate ──▶ Ready
//!    │          └──▶ ConfirmingDelete ──▶ Ready
//!    └──▶ Error ──▶ Loading (only load() is accepted)
//! ```
//!
//! A failed mutation does not enter `Error` by itself: it triggers a resync
//! load, and only a failing load lands in `Error`. Edits are counted while
//! they are in flight, so several may be outstanding at once; a load that
//! completes while edits are still out returns to `Editing`.

use std::fmt;

use fabrika_core::{RecordId, StateTransitionError};

/// The display state of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridState {
    /// Fetching the collection.
    Loading,
    /// Rows shown, no mutation outstanding.
    Ready,
    /// One or more cell edits awaiting the backend.
    Editing {
        /// Number of edits staged but not yet settled.
        in_flight: usize,
    },
    /// The create form is being submitted.
    SubmittingCreate,
    /// A delete is awaiting confirmation or the backend.
    ConfirmingDelete {
        /// The row being deleted.
        row: RecordId,
    },
    /// The last load failed. Rows from before the failure are kept.
    Error {
        /// What went wrong, for display.
        message: String,
    },
}

impl GridState {
    /// Upper-case state name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Editing { .. } => "EDITING",
            Self::SubmittingCreate => "SUBMITTING_CREATE",
            Self::ConfirmingDelete { .. } => "CONFIRMING_DELETE",
            Self::Error { .. } => "ERROR",
        }
    }

    /// Whether rows are shown and no mutation is outstanding.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether the grid shows the error state.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTransition {
    pub from: &'static str,
    pub to: &'static str,
}

/// Enforces the valid transitions and tracks in-flight edits.
#[derive(Debug, Clone)]
pub struct GridMachine {
    state: GridState,
    in_flight: usize,
    history: Vec<GridTransition>,
}

impl Default for GridMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GridMachine {
    /// A fresh grid starts in `Loading`: the first thing it does is load.
    pub fn new() -> Self {
        Self {
            state: GridState::Loading,
            in_flight: 0,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Edits staged but not yet settled.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Every transition taken so far, oldest first.
    pub fn history(&self) -> &[GridTransition] {
        &self.history
    }

    /// Enter `Loading`. Rejected while a create or delete is in progress.
    pub fn begin_load(&mut self) -> Result<(), StateTransitionError> {
        if matches!(
            self.state,
            GridState::SubmittingCreate | GridState::ConfirmingDelete { .. }
        ) {
            return Err(self.invalid("LOADING", "a create or delete is in progress"));
        }
        self.transition(GridState::Loading);
        Ok(())
    }

    /// Leave `Loading` after a successful fetch.
    pub fn finish_load(&mut self) {
        self.settle_idle();
    }

    /// Leave `Loading` after a failed fetch.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.transition(GridState::Error {
            message: message.into(),
        });
    }

    /// Count a newly staged edit.
    pub fn begin_edit(&mut self) -> Result<(), StateTransitionError> {
        match self.state {
            GridState::Ready | GridState::Editing { .. } => {
                self.in_flight += 1;
                self.transition(GridState::Editing {
                    in_flight: self.in_flight,
                });
                Ok(())
            }
            _ => Err(self.invalid("EDITING", "rows are not ready for editing")),
        }
    }

    /// Uncount a settled edit. Outside `Editing` (a resync is loading, or
    /// the last load failed) only the counter changes.
    pub fn end_edit(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if matches!(self.state, GridState::Editing { .. }) {
            self.settle_idle();
        }
    }

    /// Enter `SubmittingCreate`.
    pub fn begin_create(&mut self) -> Result<(), StateTransitionError> {
        self.require_ready("SUBMITTING_CREATE")?;
        self.transition(GridState::SubmittingCreate);
        Ok(())
    }

    /// Leave `SubmittingCreate`.
    pub fn end_create(&mut self) {
        if matches!(self.state, GridState::SubmittingCreate) {
            self.settle_idle();
        }
    }

    /// Enter `ConfirmingDelete` for `row`.
    pub fn begin_delete(&mut self, row: RecordId) -> Result<(), StateTransitionError> {
        self.require_ready("CONFIRMING_DELETE")?;
        self.transition(GridState::ConfirmingDelete { row });
        Ok(())
    }

    /// Leave `ConfirmingDelete`.
    pub fn end_delete(&mut self) {
        if matches!(self.state, GridState::ConfirmingDelete { .. }) {
            self.settle_idle();
        }
    }

    fn require_ready(&self, target: &'static str) -> Result<(), StateTransitionError> {
        match self.state {
            GridState::Ready => Ok(()),
            GridState::Editing { .. } => Err(self.invalid(target, "cell edits are still in flight")),
            _ => Err(self.invalid(target, "rows are not ready")),
        }
    }

    fn settle_idle(&mut self) {
        let next = if self.in_flight > 0 {
            GridState::Editing {
                in_flight: self.in_flight,
            }
        } else {
            GridState::Ready
        };
        self.transition(next);
    }

    fn transition(&mut self, to: GridState) {
        if self.state != to {
            tracing::trace!(from = self.state.name(), to = to.name(), "grid transition");
            self.history.push(GridTransition {
                from: self.state.name(),
                to: to.name(),
            });
        }
        self.state = to;
    }

    fn invalid(&self, to: &'static str, reason: &str) -> StateTransitionError {
        StateTransitionError::InvalidTransition {
            from: self.state.name(),
            to,
            reason: reason.to_string(),
        }
    }
}
