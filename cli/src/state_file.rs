//! File-backed `FilterStore`: a flat JSON object of string keys to string
//! values, rewritten whole on every change.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use todo_core::{FilterStore, FilterStoreError};

pub struct FileFilterStore {
    path: PathBuf,
}

impl FileFilterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, FilterStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl FilterStore for FileFilterStore {
    fn get(&self, key: &str) -> Result<Option<String>, FilterStoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), FilterStoreError> {
        // A corrupt file is replaced rather than blocking every later save.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
