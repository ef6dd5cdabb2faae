use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for durable storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write key \"{key}\": {source}")]
    Write { key: String, source: io::Error },
    #[error("could not delete key \"{key}\": {source}")]
    Delete { key: String, source: io::Error },
    #[error("could not serialize key \"{key}\": {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
}

/// A flat string-keyed document store.
///
/// Reads are tolerant: a missing or unreadable key is `None`. Writes are
/// synchronous, so a caller always observes them strictly after the state
/// transition that produced them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Key-value store backed by one file per key inside a data directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    /// Failure here is fatal to the session; there is nowhere to persist to.
    pub fn open(dir: &Path) -> Result<FileStore, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            source: e,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Resolve the default data directory, respecting XDG_DATA_HOME
pub fn default_data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"))
        .join("taskdeck")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_set_get_remove() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path()).unwrap();

        assert!(store.get("tasks").is_none());
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").as_deref(), Some("[]"));
        assert!(tmp.path().join("tasks.json").exists());

        store.remove("tasks").unwrap();
        assert!(store.get("tasks").is_none());
    }

    #[test]
    fn file_store_remove_missing_key_is_ok() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path()).unwrap();
        assert!(store.remove("user").is_ok());
    }

    #[test]
    fn file_store_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("deep").join("data");
        let store = FileStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("user", "{}").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("{}"));
        store.remove("user").unwrap();
        assert!(store.get("user").is_none());
    }

    #[test]
    fn default_data_dir_respects_xdg() {
        // Read-only check against whatever the environment has
        let dir = default_data_dir();
        assert!(dir.ends_with("taskdeck"));
    }
}
