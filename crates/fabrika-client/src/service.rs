//! The capability interface every entity collection exposes.
//!
//! [`RecordService`] is the seam between the editable grid and the backend:
//! the HTTP [`CollectionClient`](crate::CollectionClient) implements it for
//! real traffic, and an in-memory implementation stands in for tests and
//! offline use.

use async_trait::async_trait;
use fabrika_core::{Entity, Record, RecordId};

use crate::error::ApiError;

/// CRUD and uniqueness probe over one entity collection.
#[async_trait]
pub trait RecordService<E: Entity>: Send + Sync {
    /// Fetch the full, unpaginated collection.
    async fn list(&self) -> Result<Vec<Record<E>>, ApiError>;

    /// Fetch one record by identifier. `Ok(None)` if it does not exist.
    async fn get(&self, id: RecordId) -> Result<Option<Record<E>>, ApiError>;

    /// Uniqueness probe: the record currently holding `value` as its natural
    /// key, if any. Always `Ok(None)` for entities without a natural key.
    async fn find_by_natural_key(&self, value: &str) -> Result<Option<Record<E>>, ApiError>;

    /// Create a record from a draft and return it with its assigned id.
    async fn create(&self, draft: &E) -> Result<Record<E>, ApiError>;

    /// Persist the record's full field set under its id.
    async fn update(&self, record: &Record<E>) -> Result<(), ApiError>;

    /// Remove the record.
    async fn delete(&self, id: RecordId) -> Result<(), ApiError>;
}
