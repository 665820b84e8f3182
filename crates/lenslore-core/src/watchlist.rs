use crate::storage::{load_or_default, save, KeyValueStore, StorageError};
use lenslore_models::{WatchedEntry, WatchedSummary};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("{0} is already on the watched list")]
    AlreadyWatched(String),
    #[error("failed to persist watched list: {0}")]
    Persist(#[from] StorageError),
}

/// Ordered list of watched movies, mirrored in full to a key-value store
/// after every mutation.
pub struct WatchlistStore {
    store: Box<dyn KeyValueStore + Send>,
    key: String,
    entries: Vec<WatchedEntry>,
}

impl WatchlistStore {
    /// Load the list stored under `key`; anything unreadable starts empty.
    pub fn open(store: Box<dyn KeyValueStore + Send>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries: Vec<WatchedEntry> = load_or_default(store.as_ref(), &key, Vec::new());
        info!("Loaded watched list: {} entries", entries.len());
        Self { store, key, entries }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn rating_for(&self, id: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.user_rating)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    /// Append `entry`. An id can only be on the list once.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<(), WatchlistError> {
        if self.is_watched(&entry.id) {
            return Err(WatchlistError::AlreadyWatched(entry.id));
        }

        debug!(id = %entry.id, title = %entry.title, "Adding to watched list");
        self.entries.push(entry);
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the entry with `id`. Removing an id that is not there is a no-op.
    pub fn delete(&mut self, id: &str) -> Result<(), WatchlistError> {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            debug!(id = %id, "Delete ignored, not on watched list");
            return Ok(());
        };

        let removed = self.entries.remove(position);
        if let Err(e) = self.persist() {
            self.entries.insert(position, removed);
            return Err(e);
        }
        debug!(id = %id, "Removed from watched list");
        Ok(())
    }

    /// Drop every entry and the stored copy.
    pub fn clear(&mut self) -> Result<(), WatchlistError> {
        self.store.remove_item(&self.key)?;
        self.entries.clear();
        Ok(())
    }

    fn persist(&mut self) -> Result<(), WatchlistError> {
        save(self.store.as_mut(), &self.key, &self.entries)?;
        Ok(())
    }
}
