//! Login, signup and logout with their session side effects.

use snapshop_domain::UserProfile;
use tracing::{info, warn};

use super::{AuthOperations, AuthOutcome, WishlistState};
use crate::auth::SessionState;
use crate::error::{OperationError, OperationResult};

/// Ties the auth operations to the session and the wishlist mirror.
#[derive(Debug, Clone)]
pub struct SessionService {
    session: SessionState,
    auth: AuthOperations,
    wishlist: WishlistState,
}

impl SessionService {
    /// Creates the service.
    #[must_use]
    pub const fn new(session: SessionState, auth: AuthOperations, wishlist: WishlistState) -> Self {
        Self {
            session,
            auth,
            wishlist,
        }
    }

    /// Logs in, persists the credentials and loads the wishlist.
    ///
    /// A wishlist load failure is logged and does not fail the login.
    ///
    /// # Errors
    ///
    /// The login failure, or a storage failure while persisting.
    pub async fn login(&self, email: &str, password: &str) -> OperationResult<UserProfile> {
        let outcome = self.auth.login(email, password).await?;
        self.establish(outcome).await
    }

    /// Registers, logs in and persists the credentials.
    ///
    /// # Errors
    ///
    /// The signup or login failure, or a storage failure while persisting.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> OperationResult<UserProfile> {
        let outcome = self.auth.signup(username, email, password).await?;
        self.establish(outcome).await
    }

    /// Clears credentials, session and wishlist mirror.
    ///
    /// # Errors
    ///
    /// Storage failure while clearing; session and mirror are reset anyway.
    pub async fn logout(&self) -> OperationResult<()> {
        let cleared = self.session.logout().await;
        self.wishlist.clear();
        cleared.map_err(|e| OperationError::failed(e.to_string()))
    }

    async fn establish(&self, outcome: AuthOutcome) -> OperationResult<UserProfile> {
        let AuthOutcome {
            access_token,
            refresh_token,
            user,
        } = outcome;

        self.session
            .credentials()
            .save(&access_token, refresh_token.as_deref(), &user)
            .await
            .map_err(|e| OperationError::failed(e.to_string()))?;
        self.session.set_credentials(user.clone(), access_token);
        info!(user = user.display_name(), "session established");

        if let Err(error) = self.wishlist.refresh().await {
            warn!(%error, "could not load wishlist after login");
        }
        Ok(user)
    }
}
