use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// File system abstraction for testability and flexibility
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read entire file contents
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write data to a file
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Delete a file
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Move a file over another, replacing the destination
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Persistent string key-value store scoped to one user profile.
///
/// The resolver touches a single key (`deviceId`) and never manages the
/// lifetime of the store itself.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never set
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
