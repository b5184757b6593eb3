//! SnapShop Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and
//! logging setup for the binary.

pub mod adapters;
pub mod logging;
pub mod persistence;
pub mod serialization;

pub use adapters::ReqwestTransport;
pub use logging::{DEFAULT_LOG_FILTER, init_tracing};
pub use persistence::{
    CREDENTIALS_FILE, FileKeyValueStore, SETTINGS_FILE, SettingsError,
    SettingsRepository, config_dir,
};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
