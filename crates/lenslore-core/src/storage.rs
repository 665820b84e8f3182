use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string store keyed by name.
///
/// Values are opaque strings; structured data goes through
/// [`load_or_default`] and [`save`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read `key` and parse it as JSON, returning `default` when the key is
/// absent or the stored text does not parse.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    let Some(raw) = store.get_item(key) else {
        debug!("Storage miss: {} (key not set)", key);
        return default;
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Stored value for {} is unreadable ({}), using default", key, e);
            default
        }
    }
}

/// Serialize `value` as JSON and write it under `key`.
pub fn save<T>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_item(key, raw)
}

/// In-process store, used for ephemeral sessions and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Disk-backed store: one JSON object mapping keys to string values.
///
/// Every write replaces the whole file through a temp file and a rename, so a
/// failed write leaves the previous contents (and every other key) intact.
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is backed up and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = Self::read_items(&path);
        Self { path, items }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            debug!("Storage file {:?} does not exist, starting empty", path);
            return BTreeMap::new();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read storage file {:?}: {}. Starting empty.", path, e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(items) => {
                info!("Loaded storage: {} key(s) from {:?}", items.len(), path);
                items
            }
            Err(e) => {
                let backup_path = path.with_extension("json.bak");
                if let Err(backup_err) = std::fs::copy(path, &backup_path) {
                    warn!(
                        "Storage file is corrupt ({}) and could not be backed up: {}. Starting empty.",
                        e, backup_err
                    );
                } else {
                    warn!(
                        "Storage file is corrupt ({}). Backed up to {:?} and starting empty.",
                        e, backup_path
                    );
                }
                BTreeMap::new()
            }
        }
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(items)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, json)?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Storage saved: {} key(s) to {:?}", items.len(), self.path);
        Ok(())
    }

    fn update(&mut self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let mut next = self.items.clone();
        apply(&mut next);
        self.persist(&next)?;
        self.items = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|items| {
            items.insert(key.to_string(), value);
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }
}
