//! JSON-file field store.
//!
//! The whole store lives in one JSON document. It is read once on open and
//! rewritten after every write batch, which is plenty for a workbench
//! holding a handful of fields.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use submit_compare_core::error::StoreError;
use submit_compare_core::traits::{FieldKey, FieldStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    fields: Vec<StoredField>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredField {
    #[serde(flatten)]
    key: FieldKey,
    value: Value,
}

/// A [`FieldStore`] persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    fields: Mutex<HashMap<FieldKey, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let fields = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read state file: {}", path.display()))?;
            let file: StoreFile = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse state file: {}", path.display()))?;
            file.fields.into_iter().map(|f| (f.key, f.value)).collect()
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %path.display(), fields = fields.len(), "opened field store");
        Ok(Self {
            path,
            fields: Mutex::new(fields),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, fields: &HashMap<FieldKey, Value>) -> Result<(), StoreError> {
        let mut stored: Vec<StoredField> = fields
            .iter()
            .map(|(key, value)| StoredField {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        // Sorted by usage, scope, user, name
        stored.sort_by(|a, b| {
            (&a.key.usage_id, a.key.scope.to_string(), &a.key.user_id, &a.key.name).cmp(&(
                &b.key.usage_id,
                b.key.scope.to_string(),
                &b.key.user_id,
                &b.key.name,
            ))
        });

        let json = serde_json::to_string_pretty(&StoreFile { fields: stored })
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(&self.path, json)
            .map_err(|e| StoreError::Backend(format!("{}: {e}", self.path.display())))
    }
}

impl FieldStore for JsonFileStore {
    fn get(&self, key: &FieldKey) -> Result<Option<Value>, StoreError> {
        let fields = self
            .fields
            .lock()
            .map_err(|_| StoreError::Backend("file store lock poisoned".into()))?;
        Ok(fields.get(key).cloned())
    }

    fn set_many(&self, entries: &[(FieldKey, Value)]) -> Result<(), StoreError> {
        let mut fields = self
            .fields
            .lock()
            .map_err(|_| StoreError::Backend("file store lock poisoned".into()))?;
        // Memory only changes once the file is written
        let mut updated = fields.clone();
        updated.extend(entries.iter().cloned());
        self.flush(&updated)?;
        *fields = updated;
        Ok(())
    }
}
