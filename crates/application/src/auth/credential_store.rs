//! Durable credential storage.
//!
//! Persists the access token, refresh token and serialized user under three
//! keys of a [`KeyValueStore`]. A token without a parseable user is treated
//! as corrupt: `load` purges it and reports no record.

use std::sync::Arc;

use snapshop_domain::{CredentialKey, CredentialRecord, UserProfile};
use tracing::warn;

use crate::ports::{KeyValueStore, StorageError};

/// Errors raised by the credential store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// The underlying storage failed.
    #[error("credential storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The user profile could not be serialized.
    #[error("failed to serialize user profile: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Credential store backed by a key/value port.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a store over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Writes token, refresh token and user.
    ///
    /// When `refresh_token` is `None` the stored refresh token is left as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be serialized or a write fails.
    pub async fn save(
        &self,
        token: &str,
        refresh_token: Option<&str>,
        user: &UserProfile,
    ) -> Result<(), CredentialStoreError> {
        let serialized_user = serde_json::to_string(user)?;
        self.storage
            .set(CredentialKey::Token.as_str(), token)
            .await?;
        if let Some(refresh_token) = refresh_token {
            self.storage
                .set(CredentialKey::RefreshToken.as_str(), refresh_token)
                .await?;
        }
        self.storage
            .set(CredentialKey::User.as_str(), &serialized_user)
            .await?;
        Ok(())
    }

    /// Reads back the token and user.
    ///
    /// Returns `None` when nothing is stored. A partial or unparseable record
    /// is cleared before `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or cleared.
    pub async fn load(&self) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let token = self.storage.get(CredentialKey::Token.as_str()).await?;
        let user = self.storage.get(CredentialKey::User.as_str()).await?;

        if token.is_none() && user.is_none() {
            return Ok(None);
        }

        if let Some(record) = CredentialRecord::parse(token.as_deref(), user.as_deref()) {
            return Ok(Some(record));
        }

        warn!("stored credentials are incomplete or corrupt, clearing them");
        self.clear().await?;
        Ok(None)
    }

    /// Removes token, user and refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub async fn clear(&self) -> Result<(), CredentialStoreError> {
        let keys: Vec<&str> = CredentialKey::all().iter().map(|k| k.as_str()).collect();
        self.storage.remove_all(&keys).await?;
        Ok(())
    }

    /// Current access token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub async fn access_token(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self
            .storage
            .get(CredentialKey::Token.as_str())
            .await?
            .filter(|t| !t.is_empty()))
    }

    /// Current refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub async fn refresh_token(&self) -> Result<Option<String>, CredentialStoreError> {
        Ok(self
            .storage
            .get(CredentialKey::RefreshToken.as_str())
            .await?
            .filter(|t| !t.is_empty()))
    }

    /// Replaces the stored access token, keeping user and refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub async fn update_access_token(&self, token: &str) -> Result<(), CredentialStoreError> {
        self.storage
            .set(CredentialKey::Token.as_str(), token)
            .await?;
        Ok(())
    }
}
