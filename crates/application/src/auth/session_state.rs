//! Observable session state.
//!
//! `SessionState` is an explicit context object: clone it into every
//! component that needs to read or change the signed-in identity. Reads are
//! synchronous; observers subscribe to a `watch` channel and see every
//! change.

use std::sync::Arc;

use snapshop_domain::{Session, UserProfile};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{CredentialStore, CredentialStoreError};

/// Process-wide session state.
#[derive(Debug, Clone)]
pub struct SessionState {
    sender: Arc<watch::Sender<Session>>,
    credentials: CredentialStore,
}

impl SessionState {
    /// Creates a signed-out session over the given credential store.
    #[must_use]
    pub fn new(credentials: CredentialStore) -> Self {
        let (sender, _) = watch::channel(Session::anonymous());
        Self {
            sender: Arc::new(sender),
            credentials,
        }
    }

    /// Creates the session from whatever the credential store holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub async fn restore(credentials: CredentialStore) -> Result<Self, CredentialStoreError> {
        let state = Self::new(credentials);
        if let Some(record) = state.credentials.load().await? {
            info!(email = %record.user.email, "restored stored session");
            state.set_credentials(record.user, record.token);
        }
        Ok(state)
    }

    /// The credential store this session persists to.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Current session value.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// True iff the current access token is non-empty.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_authenticated()
    }

    /// Current user, if signed in.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.sender.borrow().user.clone()
    }

    /// Current access token, if signed in.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.sender.borrow().access_token.clone()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }

    /// Replaces user and token together.
    pub fn set_credentials(&self, user: UserProfile, access_token: impl Into<String>) {
        self.sender.send_replace(Session::new(user, access_token));
    }

    /// Replaces the access token after a refresh, keeping the user.
    ///
    /// A signed-out session is left untouched so a token never exists
    /// without a user. Returns whether the token was replaced.
    pub fn update_access_token(&self, access_token: impl Into<String>) -> bool {
        let access_token = access_token.into();
        let replaced = self.sender.send_if_modified(|session| {
            if session.user.is_none() {
                return false;
            }
            session.access_token = Some(access_token);
            true
        });
        if replaced {
            debug!("session access token replaced");
        } else {
            warn!("ignoring refreshed access token for a signed-out session");
        }
        replaced
    }

    /// Clears stored credentials, then resets to the signed-out session.
    ///
    /// The in-memory session is reset even if clearing storage fails.
    ///
    /// # Errors
    ///
    /// Returns the storage error, if any, after the reset.
    pub async fn logout(&self) -> Result<(), CredentialStoreError> {
        let cleared = self.credentials.clear().await;
        self.sender.send_replace(Session::anonymous());
        info!("session cleared");
        cleared
    }
}
