use crate::error::Result;

/// A process-local key-value area holding opaque blobs.
///
/// Reads and writes are synchronous and replace the whole value for a key.
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
