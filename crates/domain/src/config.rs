//! Client configuration
//!
//! Settings the client needs to reach the backend and localise searches.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Default backend endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default transport timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How concurrent 401 responses share the refresh exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every request that sees a 401 runs its own refresh.
    #[default]
    Independent,
    /// Refreshes are serialised; a waiter whose token was already replaced
    /// retries with the new token instead of refreshing again.
    SingleFlight,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL; request paths are resolved against it.
    pub base_url: String,
    /// Transport timeout in seconds.
    pub timeout_secs: u64,
    /// Country code forwarded to the search endpoint.
    pub country_code: String,
    /// Currency forwarded to the search endpoint.
    pub currency: String,
    /// Refresh coordination across concurrent requests.
    pub refresh_policy: RefreshPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            country_code: "IN".to_string(),
            currency: "INR".to_string(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the refresh policy.
    #[must_use]
    pub const fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Checks the configuration before a client is built from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL or the timeout is zero.
    pub fn validate(&self) -> DomainResult<()> {
        let url = self.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DomainError::InvalidBaseUrl(format!(
                "'{url}' must start with http:// or https://"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(DomainError::invalid_field("timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.refresh_policy, RefreshPolicy::Independent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://api.example.com/","refresh_policy":"single_flight"}"#)
                .unwrap();
        assert_eq!(config.normalized_base_url(), "https://api.example.com");
        assert_eq!(config.refresh_policy, RefreshPolicy::SingleFlight);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig::default().with_base_url("ftp://host");
        assert!(matches!(config.validate(), Err(DomainError::InvalidBaseUrl(_))));

        let mut config = ClientConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
