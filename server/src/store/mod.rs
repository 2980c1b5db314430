//! Persistence boundary for todo records.
//!
//! # Design
//! Handlers only see `TodoStore`. A store assigns ids, stamps timestamps and
//! serializes conflicting writes itself, so the HTTP layer holds no mutable
//! state of its own. Missing records are reported as `None`/`false` rather
//! than as errors; `StoreError` is reserved for the store actually failing.

mod memory;
mod sqlite;

use crate::model::{Todo, TodoId, TodoText};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("unsupported schema version {found}, latest supported is {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("invalid persisted todo: {0}")]
    InvalidData(String),
}

pub trait TodoStore: Send + Sync {
    /// All records, newest `created_at` first. Records created in the same
    /// millisecond keep reverse insertion order.
    fn list(&self) -> StoreResult<Vec<Todo>>;

    fn create(&self, text: TodoText) -> StoreResult<Todo>;

    fn get(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    fn update_text(&self, id: TodoId, text: TodoText) -> StoreResult<Option<Todo>>;

    fn toggle(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Returns `false` when no record had this id.
    fn delete(&self, id: TodoId) -> StoreResult<bool>;
}
