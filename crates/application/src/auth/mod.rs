//! Session and request-authorization subsystem.
//!
//! This module provides:
//! - Durable credential storage with self-healing loads
//! - Observable, process-wide session state
//! - The refresh-token exchange

mod credential_store;
mod refresher;
mod session_state;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use refresher::{RefreshError, TokenRefresher, REFRESH_PATH};
pub use session_state::SessionState;

/// Shortened form of a token that is safe to log (first 8 chars + ...).
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.chars().count() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}
