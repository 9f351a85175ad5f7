use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::domain::ApplicationRecord;
use super::lock;

/// Slot name used by the public site for in-progress applications.
pub const DEFAULT_SLOT: &str = "puppyhub-application-form";

/// String-keyed, string-valued durable storage (browser local storage, a directory, ...).
pub trait StoragePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-local storage. Clones share the same slots.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.slots).contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        lock(&self.slots).get(key).cloned()
    }
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.slots).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.slots).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.slots).remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot under a base directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the base directory if needed.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage = Self::new(base_path);
        fs::create_dir_all(&storage.base_path)?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

/// Keys become file names: no separators, no `..`, no control characters.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || key.contains('/')
        || key.contains('\\')
        || key.contains("..")
        || key.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Best-effort persistence of one application record in a named slot.
///
/// Failures are logged and swallowed: losing saved progress must never break the form.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    storage: Arc<S>,
    slot: String,
}

impl<S> Clone for PersistenceAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            slot: self.slot.clone(),
        }
    }
}

impl<S: StoragePort> PersistenceAdapter<S> {
    pub fn new(storage: Arc<S>, slot: impl Into<String>) -> Self {
        Self {
            storage,
            slot: slot.into(),
        }
    }

    pub fn with_default_slot(storage: Arc<S>) -> Self {
        Self::new(storage, DEFAULT_SLOT)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn save(&self, record: &ApplicationRecord) {
        let serialized = match serde_json::to_string(record) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "failed to serialize application form");
                return;
            }
        };

        match self.storage.set(&self.slot, &serialized) {
            Ok(()) => debug!(slot = %self.slot, bytes = serialized.len(), "saved application form"),
            Err(err) => warn!(slot = %self.slot, error = %err, "failed to save application form"),
        }
    }

    /// Saved record, or `None` when the slot is empty, unreadable, or corrupt.
    pub fn load(&self) -> Option<ApplicationRecord> {
        let raw = match self.storage.get(&self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "failed to read application form");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "discarding unparseable application form");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(&self.slot) {
            warn!(slot = %self.slot, error = %err, "failed to clear application form");
        }
    }

    pub fn has_saved(&self) -> bool {
        matches!(self.storage.get(&self.slot), Ok(Some(_)))
    }
}
