//! Login and signup.

use serde::Deserialize;
use serde_json::json;
use snapshop_domain::{ApiRequest, DomainError, UserProfile};
use tracing::info;

use crate::client::{ApiClient, ClientError};
use crate::error::{OperationError, OperationResult};

const LOGIN_PATH: &str = "/login";
const REGISTER_PATH: &str = "/register";

const LOGIN_FAILED: &str = "Login failed.";
const SIGNUP_FAILED: &str = "Signup failed.";

/// Tokens and identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived token used by the refresh exchange.
    pub refresh_token: Option<String>,
    /// Logged-in user.
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Login and signup requests.
///
/// Neither operation touches the session; callers persist the outcome.
#[derive(Debug, Clone)]
pub struct AuthOperations {
    client: ApiClient,
}

impl AuthOperations {
    /// Creates the operations over `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for tokens.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input, `Failed` carrying the server message
    /// (for example "Invalid email or password") or "Login failed.".
    pub async fn login(&self, email: &str, password: &str) -> OperationResult<AuthOutcome> {
        require("email", email)?;
        require("password", password)?;

        let request = ApiRequest::post(LOGIN_PATH)
            .anonymous()
            .with_json(json!({ "email": email, "password": password }));
        let response: LoginResponse = self
            .client
            .send_json(request)
            .await
            .map_err(|e| OperationError::from_client(e, LOGIN_FAILED))?;

        if response.access_token.is_empty() {
            return Err(OperationError::from_client(
                ClientError::MalformedResponse("empty access_token".to_string()),
                LOGIN_FAILED,
            ));
        }

        info!(email, "logged in");
        Ok(AuthOutcome {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            user: response
                .user
                .unwrap_or_else(|| UserProfile::from_email(email)),
        })
    }

    /// Registers an account, then logs in with the same credentials.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input. Registration failures carry the server
    /// message (for example "User already exists") or "Signup failed."; a
    /// failure of the follow-up login is reported like [`Self::login`].
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> OperationResult<AuthOutcome> {
        require("username", username)?;
        require("email", email)?;
        require("password", password)?;

        let request = ApiRequest::post(REGISTER_PATH).anonymous().with_json(json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        self.client
            .request(request)
            .await
            .map_err(|e| OperationError::from_client(e, SIGNUP_FAILED))?;
        info!(email, "account registered");

        let mut outcome = self.login(email, password).await?;
        if outcome.user.username.is_none() {
            outcome.user = outcome.user.with_username(username);
        }
        Ok(outcome)
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_field(field, "must not be empty"));
    }
    Ok(())
}
