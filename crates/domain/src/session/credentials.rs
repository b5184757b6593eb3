//! Durable credential record

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Keys under which the credential record is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKey {
    /// The access token string.
    Token,
    /// The refresh token string.
    RefreshToken,
    /// The JSON-serialized user profile.
    User,
}

impl CredentialKey {
    /// Every key, in the order they are written.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Token, Self::RefreshToken, Self::User]
    }

    /// Storage key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

/// A valid token and user pair read back from durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Stored access token.
    pub token: String,
    /// Stored user profile.
    pub user: UserProfile,
}

impl CredentialRecord {
    /// Parses raw stored values into a record.
    ///
    /// Returns `None` when either value is missing, the token is empty, or
    /// the user does not parse; such a record is corrupt.
    #[must_use]
    pub fn parse(token: Option<&str>, serialized_user: Option<&str>) -> Option<Self> {
        let token = token.filter(|t| !t.is_empty())?;
        let user = serde_json::from_str::<UserProfile>(serialized_user?).ok()?;
        Some(Self {
            token: token.to_string(),
            user,
        })
    }
}
