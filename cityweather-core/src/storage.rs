//! Durable key-value storage surviving between runs.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{Config, error::StoreError};

/// Key under which the last successfully searched city is kept.
pub const LAST_CITY_KEY: &str = "lastCity";

/// String key-value store; writes are last-write-wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Flat TOML table of strings in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = Config::state_file_path().ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| StoreError::Io(self.path.clone(), e))?;

        toml::from_str(&contents).map_err(|e| StoreError::Parse(self.path.clone(), e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
        }

        let toml = toml::to_string(&entries)?;
        fs::write(&self.path, toml).map_err(|e| StoreError::Io(self.path.clone(), e))
    }
}

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.lock().insert(key.to_string(), value.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.toml"));

        assert_eq!(store.get(LAST_CITY_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("state.toml");

        FileStore::new(&path).set(LAST_CITY_KEY, "Berlin").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Berlin"));
    }

    #[test]
    fn file_store_last_write_wins_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.toml"));

        store.set("other", "kept").unwrap();
        store.set(LAST_CITY_KEY, "Paris").unwrap();
        store.set(LAST_CITY_KEY, "Москва").unwrap();

        assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Москва"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "not = [valid").unwrap();

        let err = FileStore::new(&path).get(LAST_CITY_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Parse(..)));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::with_entry(LAST_CITY_KEY, "Berlin");
        assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Berlin"));

        store.set(LAST_CITY_KEY, "Paris").unwrap();
        assert_eq!(store.get(LAST_CITY_KEY).unwrap().as_deref(), Some("Paris"));
        assert_eq!(store.get("missing").unwrap(), None);
    }
}
