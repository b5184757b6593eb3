//! Operation error types

use snapshop_domain::{DomainError, StatusCode};
use thiserror::Error;

use crate::client::ClientError;

/// Message shown when the session could not be renewed.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Failure of a domain operation, normalised to a displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The session expired and was cleared.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The request failed.
    #[error("{message}")]
    Failed {
        /// Server-provided message, transport message or operation fallback.
        message: String,
        /// Final HTTP status, when a response was received.
        status: Option<StatusCode>,
    },
}

impl OperationError {
    /// Normalises a client failure.
    ///
    /// The message is taken from the response body when it has one, then from
    /// the transport error, then `fallback`.
    #[must_use]
    pub fn from_client(error: ClientError, fallback: &str) -> Self {
        match error {
            ClientError::SessionExpired { .. } => Self::SessionExpired,
            ClientError::Status { status, response } => Self::Failed {
                message: response
                    .error_message()
                    .unwrap_or_else(|| fallback.to_string()),
                status: Some(status),
            },
            ClientError::Transport(e) => Self::failed(e.to_string()),
            ClientError::Credentials(e) => Self::failed(e.to_string()),
            ClientError::MalformedResponse(_) => Self::failed(fallback),
        }
    }

    /// A failure without an HTTP status.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            status: None,
        }
    }

    /// Returns true if the user has to log in again.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<DomainError> for OperationError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}

/// Result type alias for domain operations.
pub type OperationResult<T> = Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TransportError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use snapshop_domain::ApiResponse;

    #[test]
    fn test_server_message_wins() {
        let error = ClientError::from_response(ApiResponse::json(
            400,
            &json!({"error": "Item already exists in wishlist"}),
        ));
        let op = OperationError::from_client(error, "Failed to add item to wishlist.");
        assert_eq!(op.to_string(), "Item already exists in wishlist");
        assert!(matches!(op, OperationError::Failed { status: Some(s), .. } if s.as_u16() == 400));
    }

    #[test]
    fn test_fallback_when_body_has_no_message() {
        let error = ClientError::from_response(ApiResponse::new(502, "<html>bad gateway</html>"));
        let op = OperationError::from_client(error, "Search failed.");
        assert_eq!(op.to_string(), "Search failed.");
    }

    #[test]
    fn test_transport_message_used() {
        let error = ClientError::Transport(TransportError::Timeout { timeout_ms: 30_000 });
        let op = OperationError::from_client(error, "Search failed.");
        assert_eq!(op.to_string(), TransportError::Timeout { timeout_ms: 30_000 }.to_string());
    }

    #[test]
    fn test_session_expiry_stays_distinguishable() {
        let op = OperationError::from_client(
            ClientError::SessionExpired { cause: None },
            "Failed to fetch wishlist.",
        );
        assert!(op.is_session_expired());
        assert_eq!(op.to_string(), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_domain_error_is_validation() {
        let op: OperationError =
            DomainError::MissingIdentifier("product id".to_string()).into();
        assert!(matches!(op, OperationError::Validation(_)));
    }
}
