//! # fabrika-grid: Editable Record Grid
//!
//! The optimistic edit-and-reconcile grid shared by every directory view.
//! One [`EditableRecordGrid`] holds the rows of one entity collection and
//! talks to the backend only through a
//! [`RecordService`](fabrika_client::RecordService), so the same grid runs
//! against the HTTP client or against [`MemoryService`].
//!
//! ## Modules
//!
//! - [`grid`]: the grid and its load/edit/create/delete protocol.
//! - [`edit`]: staged cell edits and their background submission.
//! - [`state`]: the display state machine.
//! - [`host`]: the notification and confirmation seam.
//! - [`view`]: filtered and sorted row views.
//! - [`refresh`]: periodic reload timer.
//! - [`memory`]: in-memory record service.

pub mod edit;
pub mod error;
pub mod grid;
pub mod host;
pub mod memory;
pub mod refresh;
pub mod state;
pub mod view;

pub use edit::{EditOutcome, EditResult, PendingEdit};
pub use error::GridError;
pub use grid::{EditableRecordGrid, MutationOutcome, ReconcilePolicy};
pub use host::{GridHost, Notice, NoticeKind, RecordingHost};
pub use memory::{MemoryService, Operation, ServiceCall};
pub use refresh::{RefreshTimer, CONTACTS_REFRESH};
pub use state::{GridMachine, GridState, GridTransition};
pub use view::{SortOrder, ViewOptions};
