//! Client core error type

use snapshop_domain::{ApiResponse, StatusCode};

use crate::auth::{CredentialStoreError, RefreshError};
use crate::ports::TransportError;

/// Failure of a request issued through the client core.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response could be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status that was not recovered by a
    /// refresh.
    #[error("request failed with status {status}")]
    Status {
        /// Final status.
        status: StatusCode,
        /// Full response, kept for message extraction.
        response: ApiResponse,
    },

    /// The session could not be renewed; credentials were cleared.
    #[error("session expired")]
    SessionExpired {
        /// The refresh failure, or `None` when no refresh token was stored.
        #[source]
        cause: Option<RefreshError>,
    },

    /// A 2xx response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Credential storage failed while authorizing the request.
    #[error(transparent)]
    Credentials(#[from] CredentialStoreError),
}

impl ClientError {
    /// Wraps a non-2xx response.
    #[must_use]
    pub fn from_response(response: ApiResponse) -> Self {
        Self::Status {
            status: response.status,
            response,
        }
    }

    /// Returns true if the session was cleared because of this failure.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Status code of the final response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message carried in the error body of a non-2xx response.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status { response, .. } => response.error_message(),
            _ => None,
        }
    }
}
