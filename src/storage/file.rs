use crate::{
    error::{GenerationError, Result},
    storage::traits::SettingsStore,
};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Keys become file names, so only `[A-Za-z0-9._-]` is allowed and no leading dot.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    root: PathBuf,
}

impl FileSettingsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(GenerationError::PersistenceError(format!(
                "Invalid settings key '{}'",
                key
            )));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl SettingsStore for FileSettingsStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GenerationError::PersistenceError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            GenerationError::PersistenceError(format!(
                "Failed to create {}: {}",
                self.root.display(),
                e
            ))
        })?;
        fs::write(&path, value).map_err(|e| {
            GenerationError::PersistenceError(format!(
                "Failed to write {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
