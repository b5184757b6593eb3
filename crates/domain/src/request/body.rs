//! HTTP Request body types

use serde_json::Value;

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    /// Form field name.
    pub field: String,
    /// File name sent in the part's content disposition.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Body of an outbound API request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON document
    Json(Value),
    /// Multipart form with a single file part
    Multipart(MultipartFile),
}

impl RequestBody {
    /// Creates an empty JSON object body (`{}`).
    #[must_use]
    pub fn empty_json() -> Self {
        Self::Json(Value::Object(serde_json::Map::new()))
    }

    /// Creates a multipart body carrying one file.
    #[must_use]
    pub fn file(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Multipart(MultipartFile {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        })
    }
}
