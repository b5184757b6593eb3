//! SnapShop Application - Session and request authorization
//!
//! This crate holds the client's behaviour on top of the domain types:
//! credential persistence, the observable session, the bearer-attaching
//! HTTP client core with its refresh-and-retry protocol, and the domain
//! operations (auth, product search, wishlist).
//!
//! I/O happens only through the traits in [`ports`], implemented by the
//! infrastructure crate.

pub mod auth;
pub mod client;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use auth::{CredentialStore, CredentialStoreError, RefreshError, SessionState, TokenRefresher};
pub use client::{ApiClient, Attempt, ClientError};
pub use error::{OperationError, OperationResult, SESSION_EXPIRED_MESSAGE};
pub use ports::{HttpTransport, KeyValueStore, StorageError, TransportError, TransportFuture};
pub use use_cases::{
    AnalysisOutcome, AuthOperations, AuthOutcome, ProductSearch, SearchOutcome, SessionService,
    WishlistOperations, WishlistState,
};
