//! Remote wishlist CRUD.

use serde::Deserialize;
use serde_json::{json, Value};
use snapshop_domain::{ApiRequest, DomainError, Product};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{OperationError, OperationResult};

const WISHLIST_PATH: &str = "/wishlist-protected";

const FETCH_FAILED: &str = "Failed to fetch wishlist.";
const ADD_FAILED: &str = "Failed to add item to wishlist.";
const REMOVE_FAILED: &str = "Failed to remove item from wishlist.";

#[derive(Debug, Deserialize)]
struct WishlistResponse {
    #[serde(default)]
    wishlist: Vec<Value>,
}

/// Keeps the entries that parse as products with an id.
fn usable_products(entries: Vec<Value>) -> Vec<Product> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<Product>(entry) {
                Ok(product) if product.validate_id().is_ok() => Some(product),
                Ok(_) => {
                    warn!(index, "skipping wishlist entry with a blank id");
                    None
                }
                Err(error) => {
                    warn!(index, %error, "skipping unreadable wishlist entry");
                    None
                }
            }
        })
        .collect()
}

/// Wishlist requests against the backend.
///
/// These only talk to the server; [`super::WishlistState`] keeps the local
/// mirror.
#[derive(Debug, Clone)]
pub struct WishlistOperations {
    client: ApiClient,
}

impl WishlistOperations {
    /// Creates the operations over `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists the user's wishlist. Entries without a usable id are skipped.
    ///
    /// # Errors
    ///
    /// Server message or "Failed to fetch wishlist.".
    pub async fn fetch(&self) -> OperationResult<Vec<Product>> {
        let response: WishlistResponse = self
            .client
            .send_json(ApiRequest::get(WISHLIST_PATH))
            .await
            .map_err(|e| OperationError::from_client(e, FETCH_FAILED))?;
        Ok(usable_products(response.wishlist))
    }

    /// Stores a product in the user's wishlist.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id. Otherwise the server message (for example
    /// "Item already exists in wishlist") or "Failed to add item to wishlist.".
    pub async fn add(&self, product: &Product) -> OperationResult<()> {
        product.validate_id()?;

        let body = json!({
            "itemId": product.id,
            "title": product.title,
            "price": product.price,
            "currency": product.currency,
            "platform": product.platform,
            "imageUrl": product.image_url,
            "sourceLink": product.source_link,
        });
        self.client
            .post_json(WISHLIST_PATH, body)
            .await
            .map_err(|e| OperationError::from_client(e, ADD_FAILED))?;

        info!(item_id = %product.id, "wishlist item added");
        Ok(())
    }

    /// Deletes a product from the user's wishlist.
    ///
    /// Removing an id the server no longer has succeeds.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank id. Otherwise the server message or
    /// "Failed to remove item from wishlist.".
    pub async fn remove(&self, item_id: &str) -> OperationResult<()> {
        if item_id.trim().is_empty() {
            return Err(DomainError::MissingIdentifier("itemId".to_string()).into());
        }

        self.client
            .request(ApiRequest::delete(WISHLIST_PATH).with_query("itemId", item_id))
            .await
            .map_err(|e| OperationError::from_client(e, REMOVE_FAILED))?;

        info!(item_id, "wishlist item removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{CredentialStore, SessionState};
    use crate::testing::{MemoryStore, ScriptedTransport};
    use pretty_assertions::assert_eq;
    use snapshop_domain::{ApiResponse, HttpMethod, RequestBody};
    use std::sync::Arc;

    pub(crate) fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Item {id}"),
            price: 10.5,
            currency: "INR".to_string(),
            platform: "Flipkart".to_string(),
            image_url: format!("https://img.example/{id}.png"),
            source_link: format!("https://shop.example/{id}"),
        }
    }

    fn operations(transport: Arc<ScriptedTransport>) -> WishlistOperations {
        let session = SessionState::new(CredentialStore::new(MemoryStore::with(&[(
            "token", "abc",
        )])));
        WishlistOperations::new(ApiClient::new(transport, session))
    }

    #[tokio::test]
    async fn test_fetch_parses_items() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            200,
            &json!({
                "wishlist": [{
                    "id": "p1",
                    "title": "Item p1",
                    "price": 10.5,
                    "platform": "Flipkart",
                    "imageUrl": "https://img.example/p1.png",
                    "sourceLink": "https://shop.example/p1"
                }],
                "count": 1
            }),
        ))]);

        let items = operations(transport).fetch().await.unwrap();

        assert_eq!(items, vec![product("p1")]);
    }

    #[tokio::test]
    async fn test_fetch_skips_entries_without_id() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            200,
            &json!({
                "wishlist": [
                    {"id": null, "title": "Orphan", "price": 3.0},
                    {"id": "  ", "title": "Blank"},
                    {
                        "id": "p2",
                        "title": "Item p2",
                        "price": 10.5,
                        "platform": "Flipkart",
                        "imageUrl": "https://img.example/p2.png",
                        "sourceLink": "https://shop.example/p2"
                    }
                ],
                "count": 3
            }),
        ))]);

        let items = operations(transport).fetch().await.unwrap();

        assert_eq!(items, vec![product("p2")]);
    }

    #[tokio::test]
    async fn test_add_sends_item_body() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            201,
            &json!({"message": "Item added to wishlist"}),
        ))]);

        operations(transport.clone()).add(&product("p1")).await.unwrap();

        let sent = &transport.sent()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(
            sent.body,
            RequestBody::Json(json!({
                "itemId": "p1",
                "title": "Item p1",
                "price": 10.5,
                "currency": "INR",
                "platform": "Flipkart",
                "imageUrl": "https://img.example/p1.png",
                "sourceLink": "https://shop.example/p1"
            }))
        );
    }

    #[tokio::test]
    async fn test_add_duplicate_reports_server_message() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            400,
            &json!({"error": "Item already exists in wishlist"}),
        ))]);

        let err = operations(transport).add(&product("p1")).await.unwrap_err();

        assert_eq!(err.to_string(), "Item already exists in wishlist");
    }

    #[tokio::test]
    async fn test_remove_uses_item_id_query() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            200,
            &json!({"message": "Deleted successfully"}),
        ))]);

        operations(transport.clone()).remove("p1").await.unwrap();

        let sent = &transport.sent()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.query, vec![("itemId".to_string(), "p1".to_string())]);
    }

    #[tokio::test]
    async fn test_remove_blank_id_sends_nothing() {
        let transport = ScriptedTransport::queued(vec![]);

        let err = operations(transport.clone()).remove("").await.unwrap_err();

        assert!(matches!(err, OperationError::Validation(_)));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_remove_failure_falls_back() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::new(500, ""))]);

        let err = operations(transport).remove("p1").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to remove item from wishlist.");
    }
}
