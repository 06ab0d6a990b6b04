use crate::error::{IdentityError, Result};
use crate::storage::tokio_fs::TokioFileSystem;
use crate::storage::traits::{FileSystem, KeyValueStore};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

type Entries = Map<String, Value>;

/// Key-value store persisted as a flat JSON object in a single file.
///
/// Every `set`/`remove` is a read-modify-write of the whole file, guarded by
/// an async lock so writers within one process never interleave. New
/// contents go to a sibling temp file that is then renamed over the store,
/// so a failed write leaves the previous file intact.
pub struct JsonFileStore<F: FileSystem = TokioFileSystem> {
    path: PathBuf,
    fs: F,
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore<TokioFileSystem> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(path, TokioFileSystem)
    }
}

impl<F: FileSystem> JsonFileStore<F> {
    pub fn with_fs(path: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            path: path.into(),
            fs,
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<Entries> {
        if !self.fs.exists(&self.path).await {
            return Ok(Entries::new());
        }

        let bytes = self.fs.read(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }

        serde_json::from_slice::<Entries>(&bytes).map_err(|e| {
            IdentityError::storage(format!(
                "Store file {} is not a JSON object: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn save(&self, entries: &Entries) -> Result<()> {
        if entries.is_empty() {
            if self.fs.exists(&self.path).await {
                self.fs.remove_file(&self.path).await?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                self.fs.create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(entries)?;
        let temp = self.temp_path();
        let written = match self.fs.write(&temp, &data).await {
            Ok(()) => self.fs.rename(&temp, &self.path).await,
            Err(e) => Err(e),
        };

        if written.is_err() && self.fs.exists(&temp).await {
            if let Err(e) = self.fs.remove_file(&temp).await {
                tracing::warn!("Could not remove {}: {}", temp.display(), e);
            }
        }
        written
    }
}

#[async_trait]
impl<F: FileSystem> KeyValueStore for JsonFileStore<F> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;

        match entries.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => {
                tracing::warn!(
                    "Ignoring non-string value for key {} in {}: {}",
                    key,
                    self.path.display(),
                    other
                );
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(IdentityError::Storage { message }) => {
                // Nothing in an unparseable file can be kept; drop it whole
                tracing::warn!("Discarding unreadable store: {}", message);
                return self.save(&Entries::new()).await;
            }
            Err(e) => return Err(e),
        };
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
