//! # fabrika-core: Foundational Types for the fabrika Directory
//!
//! Defines the types every other crate in the workspace builds on. It has no
//! internal crate dependencies and performs no I/O. Only `serde`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`RecordId`] is not an `i64`
//!    and an [`Inn`] is not a `String`; both are validated or opaque by type.
//!
//! 2. **One generic persisted shape.** Every entity (factory, employee,
//!    manager, activity type) is a plain field struct implementing [`Entity`].
//!    The persisted form is [`Record<E>`]: the entity plus its backend-assigned
//!    identifier. The entity struct alone doubles as the creation draft.
//!
//! 3. **Field access by name goes through [`FieldSpec`].** Grids, views and
//!    the CLI address cells by field name; every entity declares its
//!    [`FieldSpec`] table once and routes reads and writes through it.
//!
//! 4. **Structured errors.** [`ValidationError`] and [`StateTransitionError`]
//!    are `thiserror` enums carrying the offending field or input.

pub mod entities;
pub mod error;
pub mod field;
pub mod identity;
pub mod record;
pub mod reference;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use entities::{ActivityType, Employee, Factory, Lead, Manager, Role};
pub use error::{StateTransitionError, ValidationError};
pub use field::{ChoiceSource, FieldKind, FieldSpec};
pub use identity::{Inn, RecordId};
pub use record::{check_required, Entity, Record};
pub use reference::{ReferenceKind, ReferenceList, ReferenceLists};
pub use value::FieldValue;
