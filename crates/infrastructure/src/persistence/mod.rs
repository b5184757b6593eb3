//! Persistence adapters.
//!
//! Credentials and settings live in the platform config directory:
//! - Linux: ~/.config/snapshop/
//! - macOS: ~/Library/Application Support/snapshop/
//! - Windows: %APPDATA%/snapshop/

mod file_key_value_store;
mod settings_repository;

use std::path::PathBuf;

pub use file_key_value_store::FileKeyValueStore;
pub use settings_repository::{SettingsError, SettingsRepository};

/// Name of the credentials file inside the config directory.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Returns the SnapShop config directory, if the platform has one.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("snapshop"))
}
