//! HTTP client core.
//!
//! Attaches the stored access token to outbound requests and, on a 401,
//! runs the refresh protocol and re-issues the request at most once.

mod api_client;
mod error;

pub use api_client::{ApiClient, Attempt};
pub use error::ClientError;
