use crate::{
    error::{GenerationError, Result},
    storage::traits::SettingsStore,
};
use std::{collections::HashMap, sync::Mutex};

/// Settings kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> GenerationError {
        GenerationError::PersistenceError("Settings lock poisoned".into())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.lock().map_err(|_| Self::poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| Self::poisoned())?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_whole_value() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.read("k").unwrap(), None);

        store.write("k", b"first").unwrap();
        store.write("k", b"second").unwrap();
        assert_eq!(store.read("k").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.read("other").unwrap(), None);
    }
}
