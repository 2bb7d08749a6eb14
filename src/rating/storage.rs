//! Key/value persistence interface and implementations
//!
//! The rating store keeps its whole roster as one JSON document under a single
//! key. This module defines the collaborator that holds that document, with an
//! in-memory implementation for embedding and tests and a file-backed one for
//! the command-line driver.

use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Trait for the external key/value store holding serialized documents
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Get the raw document stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory key/value store
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding one document
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| EngineError::Storage {
            message: "Failed to acquire store read lock".to_string(),
        })?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| EngineError::Storage {
            message: "Failed to acquire store write lock".to_string(),
        })?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed key/value store, one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| EngineError::Storage {
            message: format!("Failed to create data directory {}: {}", dir.display(), e),
        })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EngineError::Storage {
                message: format!("Failed to read {}: {}", path.display(), e),
            }
            .into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write beside the target and rename so readers never see a torn file
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value).map_err(|e| EngineError::Storage {
            message: format!("Failed to write {}: {}", staging.display(), e),
        })?;
        fs::rename(&staging, &path).map_err(|e| EngineError::Storage {
            message: format!("Failed to replace {}: {}", path.display(), e),
        })?;

        debug!("Stored {} bytes under key {}", value.len(), key);
        Ok(())
    }
}
