use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// On-disk document: values keyed by row, then column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValues {
    pub board_size: usize,
    #[serde(default)]
    pub updated_at: u64,
    #[serde(default)]
    pub rewards_applied: u64,
    pub values: Vec<Vec<f64>>,
}

/// Persistence backend for the reinforcement map.
pub trait ValueStore: Send {
    /// Read the stored document. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<StoredValues>, StoreError>;

    /// Overwrite the stored document.
    fn save(&self, values: &StoredValues) -> Result<(), StoreError>;

    /// Human-readable location for log messages.
    fn describe(&self) -> String;
}

/// JSON file backend. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ValueStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoredValues>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        let stored = serde_json::from_str(&json).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(stored))
    }

    fn save(&self, values: &StoredValues) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_string_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Process-local backend. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<StoredValues>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: StoredValues) -> Self {
        MemoryStore {
            slot: Arc::new(Mutex::new(Some(values))),
        }
    }

    /// Last saved document, if any.
    pub fn snapshot(&self) -> Option<StoredValues> {
        self.slot.lock().map(|s| s.clone()).unwrap_or_else(|p| p.into_inner().clone())
    }
}

impl ValueStore for MemoryStore {
    fn load(&self) -> Result<Option<StoredValues>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, values: &StoredValues) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        *slot = Some(values.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredValues {
        StoredValues {
            board_size: 2,
            updated_at: 1_700_000_000,
            rewards_applied: 3,
            values: vec![vec![1.0, 0.5], vec![0.0, -0.25]],
        }
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("values.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("values.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested").join("values.json.tmp").exists());
        assert_eq!(store.load().unwrap(), Some(sample()));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn test_document_without_counters_still_parses() {
        let json = r#"{ "board_size": 1, "values": [[2.5]] }"#;
        let stored: StoredValues = serde_json::from_str(json).unwrap();
        assert_eq!(stored.rewards_applied, 0);
        assert_eq!(stored.values, vec![vec![2.5]]);
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        assert!(handle.snapshot().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(handle.load().unwrap(), Some(sample()));
    }
}
