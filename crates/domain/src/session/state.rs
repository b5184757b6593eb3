//! Session value

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Snapshot of the process-wide authenticated identity.
///
/// Token and user are always replaced together; `is_authenticated` is derived
/// from the token rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user, `None` when unauthenticated.
    pub user: Option<UserProfile>,
    /// Short-lived credential authorizing API requests.
    pub access_token: Option<String>,
}

impl Session {
    /// Creates an authenticated session.
    #[must_use]
    pub fn new(user: UserProfile, access_token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token.into()),
        }
    }

    /// Creates the empty, signed-out session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            access_token: None,
        }
    }

    /// True iff an access token is present and non-empty.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
