//! File-backed key/value store.
//!
//! All keys live in one JSON object:
//! ```json
//! {
//!   "refreshToken": "eyJ...",
//!   "token": "eyJ...",
//!   "user": "{\"email\":\"a@b.com\"}"
//! }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use snapshop_application::ports::{KeyValueStore, StorageError};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{config_dir, CREDENTIALS_FILE};
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

/// Key/value store persisted as a single JSON file.
///
/// Writes are serialised through an async lock so concurrent `set` and
/// `remove` calls do not lose each other's updates. Each write lands in a
/// sibling temp file that is then renamed over the target, and a file that
/// no longer parses reads as empty so the next write replaces it.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store at the default credentials location.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, StorageError> {
        config_dir()
            .map(|dir| Self::new(dir.join(CREDENTIALS_FILE)))
            .ok_or_else(|| StorageError::Unavailable("no config directory".to_string()))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        match from_json_bytes(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "key/value file is corrupt, treating it as empty"
                );
                Ok(Entries::new())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content =
            to_json_stable_bytes(entries).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, content).await?;
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn update(&self, apply: impl FnOnce(&mut Entries) -> bool + Send) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if apply(&mut entries) {
            self.write_entries(&entries).await?;
            debug!(path = %self.path.display(), keys = entries.len(), "key/value file written");
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some()).await
    }
}
