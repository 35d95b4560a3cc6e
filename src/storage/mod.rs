pub mod file;
pub mod memory;
pub mod traits;

use crate::{config::HistoryConfig, error::Result};
use std::sync::Arc;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;
pub use traits::SettingsStore;

/// Opens the settings backend described by `config`.
/// Fails with `ConfigError` before touching any storage if the key is unusable.
pub fn open(config: &HistoryConfig) -> Result<Arc<dyn SettingsStore>> {
    config.validate()?;
    let backend: Arc<dyn SettingsStore> = if config.in_memory {
        Arc::new(MemorySettingsStore::new())
    } else {
        let directory = config.resolved_directory()?;
        log::debug!("Using settings directory {}", directory.display());
        Arc::new(FileSettingsStore::new(directory))
    };
    log::debug!(
        "History backend: {} (key '{}')",
        backend.backend_name(),
        config.key
    );
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;

    #[test]
    fn test_open_selects_backend() {
        let memory = open(&HistoryConfig::in_memory()).unwrap();
        assert_eq!(memory.backend_name(), "memory");

        let temp = tempfile::tempdir().unwrap();
        let file = open(&HistoryConfig::new().with_directory(temp.path())).unwrap();
        assert_eq!(file.backend_name(), "file");
    }

    #[test]
    fn test_open_rejects_unusable_key() {
        let temp = tempfile::tempdir().unwrap();
        let config = HistoryConfig::new()
            .with_directory(temp.path())
            .with_key("my history");

        let result = open(&config);

        assert!(matches!(result, Err(GenerationError::ConfigError(_))));
        assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
    }
}
