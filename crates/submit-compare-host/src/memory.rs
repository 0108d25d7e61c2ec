//! In-memory field store.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use submit_compare_core::error::StoreError;
use submit_compare_core::traits::{FieldKey, FieldStore};

/// A [`FieldStore`] backed by a `HashMap`, for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    fields: Mutex<HashMap<FieldKey, Value>>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<FieldKey, Value>>, StoreError> {
        self.fields
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl FieldStore for MemoryFieldStore {
    fn get(&self, key: &FieldKey) -> Result<Option<Value>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError> {
        self.lock()?.extend(entries.iter().cloned());
        Ok(())
    }
}
