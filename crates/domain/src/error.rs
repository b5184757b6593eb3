//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating input, before any I/O happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required identifier is missing or empty.
    #[error("missing identifier: {0}")]
    MissingIdentifier(String),

    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configured base URL cannot be used.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl DomainError {
    /// Creates an `InvalidField` error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
