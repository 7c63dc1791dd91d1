// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key/value backends for persisted client state.
//!
//! Two backends:
//! - `MemoryStore`: process-local, used by tests and throwaway sessions
//! - `FileStore`: a flat JSON object on disk, rewritten on every change
//!
//! The file backend reads the file once when opened. Two processes sharing a
//! file therefore overwrite each other's changes (last writer wins).

use crate::error::StorageError;
use dashmap::DashMap;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistent string key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON file storage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// `~/.config/canna-connect/session.json` on Linux, the platform
    /// equivalent elsewhere.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let proj = ProjectDirs::from("", "", "canna-connect")
            .ok_or_else(|| StorageError::Location("unable to locate config dir".to_string()))?;
        Ok(proj.config_dir().join("session.json"))
    }

    /// Open (or start) the store at `path`, loading any existing entries.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::File::open(&path) {
            Ok(file) => serde_json::from_reader(io::BufReader::new(file))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), "Session storage opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        change(&mut entries);
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &*entries)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set("access_token", "T1").unwrap();
        store.set("refresh_token", "R1").unwrap();
        store.remove("refresh_token").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token").as_deref(), Some("T1"));
        assert_eq!(reopened.get("refresh_token"), None);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Json(_))));
    }
}
