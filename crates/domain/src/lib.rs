//! SnapShop Domain - Core client types
//!
//! This crate defines the domain model for the SnapShop product-search
//! client. All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod product;
pub mod request;
pub mod response;
pub mod session;
pub mod wishlist;

pub use config::{ClientConfig, RefreshPolicy};
pub use error::{DomainError, DomainResult};
pub use product::{ImageUpload, Product, ProductInfo};
pub use request::{ApiRequest, Header, HttpMethod, MultipartFile, RequestAuth, RequestBody, AUTHORIZATION};
pub use response::{ApiResponse, StatusCode};
pub use session::{CredentialKey, CredentialRecord, Session, UserProfile};
pub use wishlist::Wishlist;
