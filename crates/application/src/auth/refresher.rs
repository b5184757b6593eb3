//! Refresh-token exchange.
//!
//! A pure exchange: it sends the refresh token and returns the new access
//! token. Persisting the token, updating the session and logging out on
//! failure are left to the caller.

use std::sync::Arc;

use serde::Deserialize;
use snapshop_domain::{ApiRequest, RequestBody, StatusCode};
use tracing::debug;

use crate::ports::{HttpTransport, TransportError};

/// Path of the refresh endpoint.
pub const REFRESH_PATH: &str = "/refresh";

/// Successful refresh response body.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Why a refresh exchange failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The refresh endpoint could not be reached.
    #[error("refresh request failed: {0}")]
    Transport(#[from] TransportError),

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with status {status}{}", message_suffix(.message.as_deref()))]
    Rejected {
        /// Status returned by the endpoint.
        status: StatusCode,
        /// Server-provided message, if any.
        message: Option<String>,
    },

    /// The endpoint answered 2xx but without a usable access token.
    #[error("malformed refresh response: {0}")]
    Malformed(String),
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Exchanges refresh tokens for access tokens.
#[derive(Clone)]
pub struct TokenRefresher {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher").finish_non_exhaustive()
    }
}

impl TokenRefresher {
    /// Creates a refresher sending through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Sends `refresh_token` as bearer credential with an empty JSON body and
    /// returns the new access token.
    ///
    /// # Errors
    ///
    /// Returns a [`RefreshError`] on network failure, non-2xx status or an
    /// unusable body. Callers must treat any error as terminal for the session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let mut request = ApiRequest::post(REFRESH_PATH).with_body(RequestBody::empty_json());
        request.set_bearer(refresh_token);

        debug!(request_id = %request.id, "exchanging refresh token");
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: response.error_message(),
            });
        }

        let body: RefreshResponse = response
            .parse_json()
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;
        if body.access_token.is_empty() {
            return Err(RefreshError::Malformed("empty access_token".to_string()));
        }
        Ok(body.access_token)
    }
}
