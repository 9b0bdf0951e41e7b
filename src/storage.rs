use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const TASKS_KEY: &str = "tasks_v4";
pub const CATEGORIES_KEY: &str = "categories_v2";
pub const SETTINGS_KEY: &str = "settings";

const FILE_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// Durable text storage keyed by fixed identifiers.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, text: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a data directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key).with_extension(FILE_EXTENSION)
    }

    fn write_atomic(&self, path: PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut file = match File::open(self.path_for(key)) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn save(&self, key: &str, text: &str) -> Result<(), StorageError> {
        self.ensure_dirs()?;
        self.write_atomic(self.path_for(key), text.as_bytes())
    }
}

/// Volatile store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, text: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, text: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_text_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.load(TASKS_KEY).unwrap().is_none());

        store.save(TASKS_KEY, "[1]").unwrap();
        store.save(CATEGORIES_KEY, "[2]").unwrap();
        assert_eq!(store.load(TASKS_KEY).unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.load(CATEGORIES_KEY).unwrap().as_deref(), Some("[2]"));
        assert!(dir.path().join("nested").join("tasks_v4.json").is_file());
        assert!(!dir.path().join("nested").join("tasks_v4.tmp").exists());

        store.save(TASKS_KEY, "[]").unwrap();
        assert_eq!(store.load(TASKS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        fs::create_dir_all(dir.path().join("tasks_v4.json")).unwrap();
        assert!(matches!(store.load(TASKS_KEY), Err(StorageError::Io(_))));

        let blocked = dir.path().join("file");
        fs::write(&blocked, b"x").unwrap();
        let store = FileStore::new(blocked);
        assert!(store.save(TASKS_KEY, "[]").is_err());
    }

    #[test]
    fn memory_store_saves_and_loads() {
        let store = MemoryStore::with_entry(SETTINGS_KEY, "{}");
        assert_eq!(store.load(SETTINGS_KEY).unwrap().as_deref(), Some("{}"));
        assert!(store.load(TASKS_KEY).unwrap().is_none());
        store.save(TASKS_KEY, "[]").unwrap();
        assert_eq!(store.get(TASKS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn storage_error_display_names_the_source() {
        let err = StorageError::from(std::io::Error::other("disk"));
        assert_eq!(err.to_string(), "io error: disk");
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(StorageError::from(json_err).to_string().starts_with("json error:"));
    }
}
