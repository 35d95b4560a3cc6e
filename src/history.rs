use crate::{
    error::{GenerationError, Result},
    models::{HistoryEntry, HistoryLog},
    storage::SettingsStore,
};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Durable, append-only record of successful generations.
///
/// The log is read once when the store is opened and then owned here for
/// the rest of the process. Every append rewrites the full log under a
/// single key of the backing [`SettingsStore`]. Appends are serialized by
/// the internal lock, so concurrent writers can't lose each other's entries.
pub struct HistoryStore {
    settings: Arc<dyn SettingsStore>,
    key: String,
    log: Mutex<HistoryLog>,
}

impl HistoryStore {
    /// Opens the store. Missing or unreadable history yields an empty log.
    pub fn load(settings: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match Self::read_log(settings.as_ref(), &key) {
            Ok(entries) => {
                log::debug!("Loaded {} history entries from '{}'", entries.len(), key);
                entries
            }
            Err(e) => {
                log::warn!("Discarding unreadable history '{}': {}", key, e);
                HistoryLog::new()
            }
        };

        Self {
            settings,
            key,
            log: Mutex::new(entries),
        }
    }

    /// Reads the persisted log without absorbing errors.
    pub fn read_log(settings: &dyn SettingsStore, key: &str) -> Result<HistoryLog> {
        match settings.read(key)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                GenerationError::PersistenceError(format!("Corrupt history data: {}", e))
            }),
            None => Ok(HistoryLog::new()),
        }
    }

    /// Appends `entry` and persists the whole log.
    ///
    /// On a persistence failure the entry stays in memory and the error is
    /// returned; the next successful append writes it out.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.lock()?;
        entries.push(entry);

        let bytes = serde_json::to_vec(&*entries).map_err(|e| {
            GenerationError::PersistenceError(format!("Failed to encode history: {}", e))
        })?;
        if let Err(e) = self.settings.write(&self.key, &bytes) {
            log::error!("Unable to save history: {}", e);
            return Err(e);
        }
        Ok(())
    }

    pub fn entries(&self) -> HistoryLog {
        self.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn get(&self, id: Uuid) -> Option<HistoryEntry> {
        self.lock()
            .ok()
            .and_then(|log| log.iter().find(|entry| entry.id == id).cloned())
    }

    pub fn latest(&self) -> Option<HistoryEntry> {
        self.lock().ok().and_then(|log| log.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|log| log.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn lock(&self) -> Result<MutexGuard<'_, HistoryLog>> {
        self.log
            .lock()
            .map_err(|_| GenerationError::PersistenceError("History lock poisoned".into()))
    }
}
