//! Persisted client preferences.
//!
//! The active filter is kept under one key, its value the JSON-serialized
//! filter string (`"all"`, `"active"` or `"completed"`). Persistence is best
//! effort: failures are logged and never reach the view.

use std::collections::HashMap;

use log::warn;

use crate::error::FilterStoreError;
use crate::types::Filter;

pub const FILTER_STATE_KEY: &str = "todo-filter-state";

/// String key-value storage that survives a client restart.
pub trait FilterStore {
    fn get(&self, key: &str) -> Result<Option<String>, FilterStoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterStoreError>;
}

/// Non-persistent store, for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilterStore {
    entries: HashMap<String, String>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterStore for MemoryFilterStore {
    fn get(&self, key: &str) -> Result<Option<String>, FilterStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterStoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Saved filter, or `Filter::All` when nothing usable is stored.
pub fn load_filter(store: &dyn FilterStore) -> Filter {
    let raw = match store.get(FILTER_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Filter::All,
        Err(err) => {
            warn!("event=filter_load status=error error={err}");
            return Filter::All;
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!("event=filter_load status=error value={raw:?} error={err}");
        Filter::All
    })
}

pub fn save_filter(store: &mut dyn FilterStore, filter: Filter) {
    let result = serde_json::to_string(&filter)
        .map_err(FilterStoreError::from)
        .and_then(|value| store.set(FILTER_STATE_KEY, &value));
    if let Err(err) = result {
        warn!("event=filter_save status=error filter={filter} error={err}");
    }
}
