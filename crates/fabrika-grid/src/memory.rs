//! In-memory [`RecordService`] for tests and offline use.
//!
//! Behaves like the directory backend where the grid can observe it: ids
//! are assigned on create, the natural key is unique (a duplicate is a 400
//! with a `detail` body), unknown ids are 404. Every call is logged, and
//! failures can be injected per operation.

use std::collections::HashMap;

use async_trait::async_trait;
use fabrika_client::{ApiError, RecordService};
use fabrika_core::{Entity, Record, RecordId};
use parking_lot::Mutex;

/// Service operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Probe,
    Create,
    Update,
    Delete,
}

/// One logged call.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall<E> {
    List,
    Get(RecordId),
    Probe(String),
    Create(E),
    Update(Record<E>),
    Delete(RecordId),
}

impl<E> ServiceCall<E> {
    pub fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Get(_) => Operation::Get,
            Self::Probe(_) => Operation::Probe,
            Self::Create(_) => Operation::Create,
            Self::Update(_) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Failure {
    status: u16,
    once: bool,
}

#[derive(Debug)]
struct MemoryState<E> {
    records: Vec<Record<E>>,
    next_id: i64,
    calls: Vec<ServiceCall<E>>,
    failures: HashMap<Operation, Failure>,
}

#[derive(Debug)]
pub struct MemoryService<E> {
    state: Mutex<MemoryState<E>>,
}

impl<E: Entity> Default for MemoryService<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryService<E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records: Vec::new(),
                next_id: 1,
                calls: Vec::new(),
                failures: HashMap::new(),
            }),
        }
    }

    /// Start with the given records. New ids continue after the largest.
    pub fn with_records(records: Vec<Record<E>>) -> Self {
        let next_id = records.iter().map(|r| r.id.get()).max().unwrap_or(0) + 1;
        let service = Self::new();
        {
            let mut state = service.state.lock();
            state.records = records;
            state.next_id = next_id;
        }
        service
    }

    /// Fail every call to `op` with `status` until cleared.
    pub fn fail_always(&self, op: Operation, status: u16) {
        self.state
            .lock()
            .failures
            .insert(op, Failure { status, once: false });
    }

    /// Fail only the next call to `op` with `status`.
    pub fn fail_next(&self, op: Operation, status: u16) {
        self.state
            .lock()
            .failures
            .insert(op, Failure { status, once: true });
    }

    pub fn clear_failures(&self) {
        self.state.lock().failures.clear();
    }

    /// Replace a stored record directly, as another operator's edit would.
    pub fn put_record(&self, record: Record<E>) {
        let mut state = self.state.lock();
        match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => state.records.push(record),
        }
    }

    pub fn records(&self) -> Vec<Record<E>> {
        self.state.lock().records.clone()
    }

    pub fn calls(&self) -> Vec<ServiceCall<E>> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, op: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation() == op)
            .count()
    }

    fn begin(&self, call: ServiceCall<E>) -> Result<parking_lot::MutexGuard<'_, MemoryState<E>>, ApiError> {
        let op = call.operation();
        let mut state = self.state.lock();
        state.calls.push(call);
        if let Some(failure) = state.failures.get(&op).copied() {
            if failure.once {
                state.failures.remove(&op);
            }
            return Err(injected_error(op, failure.status));
        }
        Ok(state)
    }
}

fn endpoint(op: Operation) -> String {
    format!("{op:?} (memory)")
}

fn status_error(op: Operation, status: u16, detail: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint(op),
        status,
        body: format!("{{\"detail\":\"{detail}\"}}"),
    }
}

fn injected_error(op: Operation, status: u16) -> ApiError {
    if status == 401 {
        return ApiError::Unauthorized {
            endpoint: endpoint(op),
            body: "{\"detail\":\"Not authenticated\"}".to_string(),
        };
    }
    status_error(op, status, "injected failure")
}

fn key_taken<E: Entity>(records: &[Record<E>], key: &str, except: Option<RecordId>) -> bool {
    records
        .iter()
        .any(|r| Some(r.id) != except && r.data.natural_key().as_deref() == Some(key))
}

#[async_trait]
impl<E: Entity> RecordService<E> for MemoryService<E> {
    async fn list(&self) -> Result<Vec<Record<E>>, ApiError> {
        let state = self.begin(ServiceCall::List)?;
        Ok(state.records.clone())
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record<E>>, ApiError> {
        let state = self.begin(ServiceCall::Get(id))?;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_natural_key(&self, value: &str) -> Result<Option<Record<E>>, ApiError> {
        if E::NATURAL_KEY.is_none() {
            return Ok(None);
        }
        let state = self.begin(ServiceCall::Probe(value.to_string()))?;
        Ok(state
            .records
            .iter()
            .find(|r| r.data.natural_key().as_deref() == Some(value))
            .cloned())
    }

    async fn create(&self, draft: &E) -> Result<Record<E>, ApiError> {
        let mut state = self.begin(ServiceCall::Create(draft.clone()))?;
        if let Some(key) = draft.natural_key() {
            if key_taken(&state.records, &key, None) {
                return Err(status_error(
                    Operation::Create,
                    400,
                    &format!("{} with this key already exists", E::KIND),
                ));
            }
        }
        let record = Record::new(RecordId::new(state.next_id), draft.clone());
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &Record<E>) -> Result<(), ApiError> {
        let mut state = self.begin(ServiceCall::Update(record.clone()))?;
        if let Some(key) = record.data.natural_key() {
            if key_taken(&state.records, &key, Some(record.id)) {
                return Err(status_error(
                    Operation::Update,
                    400,
                    &format!("{} with this key already exists", E::KIND),
                ));
            }
        }
        match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(status_error(Operation::Update, 404, "not found")),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let mut state = self.begin(ServiceCall::Delete(id))?;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(status_error(Operation::Delete, 404, "not found"));
        }
        Ok(())
    }
}
