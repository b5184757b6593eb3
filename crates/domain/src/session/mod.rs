//! Session domain types
//!
//! The authenticated identity of the client: who is signed in, which access
//! token authorizes requests, and the durable record the session is restored
//! from at startup.

mod credentials;
mod state;
mod user;

pub use credentials::{CredentialKey, CredentialRecord};
pub use state::Session;
pub use user::UserProfile;
