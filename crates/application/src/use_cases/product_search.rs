//! Image analysis and text search.

use serde::Deserialize;
use serde_json::json;
use snapshop_domain::{ApiRequest, DomainError, ImageUpload, Product, ProductInfo, RequestBody};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{OperationError, OperationResult};

const ANALYZE_IMAGE_PATH: &str = "/analyze-image";
const SEARCH_PATH: &str = "/search";
const IMAGE_FIELD: &str = "image";

const ANALYSIS_FAILED: &str = "Image analysis failed.";
const SEARCH_FAILED: &str = "Search failed.";

/// Result of an image analysis.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AnalysisOutcome {
    /// Matching products, best first.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Queries the backend derived from the image.
    #[serde(default)]
    pub search_terms: Vec<String>,
    /// Category and attributes detected in the image.
    #[serde(default)]
    pub product_info: Option<ProductInfo>,
    /// Total matches before truncation.
    #[serde(default)]
    pub results_count: Option<usize>,
}

/// Result of a text search.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchOutcome {
    /// Matching products.
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Product lookup by image or query.
#[derive(Debug, Clone)]
pub struct ProductSearch {
    client: ApiClient,
    country_code: String,
    currency: String,
}

impl ProductSearch {
    /// Creates the operations; `country_code` and `currency` are sent with
    /// every text search.
    #[must_use]
    pub fn new(
        client: ApiClient,
        country_code: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            client,
            country_code: country_code.into(),
            currency: currency.into(),
        }
    }

    /// Uploads an image and returns the products found for it.
    ///
    /// # Errors
    ///
    /// `Validation` for empty files or extensions other than png, jpg and
    /// jpeg. Otherwise the server message or "Image analysis failed.".
    pub async fn analyze_image(&self, image: ImageUpload) -> OperationResult<AnalysisOutcome> {
        image.validate()?;

        let file_name = image.file_name.clone();
        let request = ApiRequest::post(ANALYZE_IMAGE_PATH).with_body(RequestBody::file(
            IMAGE_FIELD,
            image.file_name,
            image.bytes,
        ));
        let outcome: AnalysisOutcome = self
            .client
            .send_json(request)
            .await
            .map_err(|e| OperationError::from_client(e, ANALYSIS_FAILED))?;

        info!(
            file = %file_name,
            products = outcome.products.len(),
            "image analyzed"
        );
        Ok(outcome)
    }

    /// Searches products by free text.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank query. Otherwise the server message or
    /// "Search failed.".
    pub async fn search(&self, query: &str) -> OperationResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::invalid_field("query", "must not be empty").into());
        }

        let request = ApiRequest::post(SEARCH_PATH)
            .with_query("countryCode", &self.country_code)
            .with_query("currency", &self.currency)
            .with_json(json!({ "query": query }));
        let outcome: SearchOutcome = self
            .client
            .send_json(request)
            .await
            .map_err(|e| OperationError::from_client(e, SEARCH_FAILED))?;

        info!(query, products = outcome.products.len(), "search completed");
        Ok(outcome)
    }
}
