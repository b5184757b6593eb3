//! JSON helpers for the credentials and settings files.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value as pretty JSON with 2-space indentation and a
/// trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Same as [`to_json_stable`], as bytes ready to be written.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    Ok(to_json_stable(value)?.into_bytes())
}

/// Deserializes JSON read from a file.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapshop_domain::ClientConfig;
    use std::collections::BTreeMap;

    #[test]
    fn test_credentials_map_is_sorted_and_indented() {
        let mut map = BTreeMap::new();
        map.insert("user", "{}");
        map.insert("refreshToken", "xyz");
        map.insert("token", "abc");

        let json = to_json_stable(&map).expect("serialization should work");

        assert_eq!(
            json,
            "{\n  \"refreshToken\": \"xyz\",\n  \"token\": \"abc\",\n  \"user\": \"{}\"\n}\n"
        );
    }

    #[test]
    fn test_config_written_then_read() {
        let config = ClientConfig::default().with_base_url("https://api.example.com");

        let bytes = to_json_stable_bytes(&config).expect("serialization should work");
        let restored: ClientConfig = from_json_bytes(&bytes).expect("deserialization should work");

        assert_eq!(restored, config);
    }

    #[test]
    fn test_from_json_bytes_rejects_garbage() {
        let result: Result<BTreeMap<String, String>, _> = from_json_bytes(b"{\"token\": ");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
