use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{StoreError, StoreResult, TodoStore};
use crate::model::{Todo, TodoId, TodoText};

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    // seq orders records created within the same millisecond.
    todos: HashMap<TodoId, (u64, Todo)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl TodoStore for MemoryStore {
    fn list(&self) -> StoreResult<Vec<Todo>> {
        let inner = self.read()?;
        let mut entries: Vec<_> = inner.todos.values().collect();
        entries.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(entries.into_iter().map(|(_, todo)| todo.clone()).collect())
    }

    fn create(&self, text: TodoText) -> StoreResult<Todo> {
        let todo = Todo::new(text);
        let mut inner = self.write()?;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.todos.insert(todo.id, (seq, todo.clone()));
        Ok(todo)
    }

    fn get(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let inner = self.read()?;
        Ok(inner.todos.get(&id).map(|(_, todo)| todo.clone()))
    }

    fn update_text(&self, id: TodoId, text: TodoText) -> StoreResult<Option<Todo>> {
        let mut inner = self.write()?;
        Ok(inner.todos.get_mut(&id).map(|(_, todo)| {
            todo.set_text(text);
            todo.clone()
        }))
    }

    fn toggle(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        let mut inner = self.write()?;
        Ok(inner.todos.get_mut(&id).map(|(_, todo)| {
            todo.toggle();
            todo.clone()
        }))
    }

    fn delete(&self, id: TodoId) -> StoreResult<bool> {
        let mut inner = self.write()?;
        Ok(inner.todos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[test]
    fn memory_store_honors_store_contract() {
        contract::run_all(|| Box::new(MemoryStore::new()));
    }

    #[test]
    fn empty_store_lists_nothing() {
        assert!(MemoryStore::new().list().unwrap().is_empty());
    }
}
