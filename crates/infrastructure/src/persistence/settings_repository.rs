//! Client settings persistence.
//!
//! Stores the client configuration in `settings.json` inside the SnapShop
//! config directory. A missing file means defaults.

use std::path::PathBuf;

use snapshop_domain::ClientConfig;
use tokio::fs;

use super::{config_dir, SETTINGS_FILE};
use crate::serialization::{from_json_bytes, to_json_stable_bytes, SerializationError};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository for client settings persistence.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    dir: Option<PathBuf>,
}

impl Default for SettingsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRepository {
    /// Creates a repository over the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: config_dir() }
    }

    /// Creates a repository over an explicit directory.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Returns the path where settings are stored, if available.
    #[must_use]
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(SETTINGS_FILE))
    }

    /// Loads settings from disk.
    ///
    /// Returns default settings if the file doesn't exist. Fields missing
    /// from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<ClientConfig, SettingsError> {
        let Some(path) = self.settings_path() else {
            return Ok(ClientConfig::default());
        };

        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ClientConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(from_json_bytes(&content)?)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no config directory or the write fails.
    pub async fn save(&self, config: &ClientConfig) -> Result<(), SettingsError> {
        let (Some(dir), Some(path)) = (self.dir.as_ref(), self.settings_path()) else {
            return Err(SettingsError::NoConfigDir);
        };

        fs::create_dir_all(dir).await?;
        let content = to_json_stable_bytes(config)?;
        fs::write(&path, content).await?;
        Ok(())
    }
}
