//! Product and search result types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Image extensions the backend accepts for analysis.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

fn default_currency() -> String {
    "INR".to_string()
}

/// A product returned by search or stored in the wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier; also the wishlist key.
    pub id: String,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Price in `currency`.
    #[serde(default)]
    pub price: f64,
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Marketplace the product was found on.
    #[serde(default)]
    pub platform: String,
    /// Product image.
    #[serde(default)]
    pub image_url: String,
    /// Link to the product page.
    #[serde(default)]
    pub source_link: String,
}

impl Product {
    /// Rejects products that cannot be keyed in the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` when the id is blank.
    pub fn validate_id(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::MissingIdentifier("product id".to_string()));
        }
        Ok(())
    }
}

/// Structured description the backend derived from an analyzed image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Category labels.
    #[serde(default)]
    pub category: Vec<String>,
    /// Attribute labels (colour, material, ...).
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// An image selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, used for the extension check and the multipart part.
    pub file_name: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates a new upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lower-cased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Checks the upload before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` for empty files or unsupported extensions.
    pub fn validate(&self) -> DomainResult<()> {
        if self.bytes.is_empty() {
            return Err(DomainError::invalid_field("image", "file is empty"));
        }
        match self.extension() {
            Some(ext) if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(DomainError::invalid_field(
                "image",
                format!(
                    "unsupported file type '{}', expected one of: {}",
                    self.file_name,
                    SUPPORTED_IMAGE_EXTENSIONS.join(", ")
                ),
            )),
        }
    }
}
