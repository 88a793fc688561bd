// Key-value storage backends
// The preset library talks to storage through a narrow string-keyed
// interface, so it runs identically over files or a map in memory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-keyed persistence, one JSON document per key
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile store for tests and no-persistence sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key under a root directory.
/// The directory is created on the first write, not at construction, so
/// pointing at a missing directory just reads as empty.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Per-user data directory for this application, if the platform has one
    pub fn default_location() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("clickster"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();

        assert_eq!(store.get("songs").unwrap(), None);

        store.set("songs", "[1,2,3]").unwrap();
        assert_eq!(store.get("songs").unwrap(), Some("[1,2,3]".to_string()));

        store.set("songs", "[]").unwrap();
        assert_eq!(store.get("songs").unwrap(), Some("[]".to_string()));

        store.remove("songs").unwrap();
        assert_eq!(store.get("songs").unwrap(), None);

        // Removing again is fine
        store.remove("songs").unwrap();
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        assert_eq!(store.get("setlists").unwrap(), None);

        store.set("setlists", r#"{"gig":[]}"#).unwrap();
        assert_eq!(
            store.get("setlists").unwrap(),
            Some(r#"{"gig":[]}"#.to_string())
        );
        assert!(dir.path().join("setlists.json").exists());

        store.remove("setlists").unwrap();
        assert_eq!(store.get("setlists").unwrap(), None);
        store.remove("setlists").unwrap();
    }

    #[test]
    fn test_file_store_creates_root_on_first_write() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let mut store = FileStore::new(&root);

        // Missing directory reads as empty rather than erroring
        assert_eq!(store.get("songs").unwrap(), None);

        store.set("songs", "[]").unwrap();
        assert!(root.join("songs.json").exists());
    }

    #[test]
    fn test_file_store_values_survive_reopen() {
        let dir = tempdir().unwrap();

        {
            let mut store = FileStore::new(dir.path());
            store.set("songs", r#"[{"name":"A"}]"#).unwrap();
        }

        let store = FileStore::new(dir.path());
        assert_eq!(
            store.get("songs").unwrap(),
            Some(r#"[{"name":"A"}]"#.to_string())
        );
    }
}
