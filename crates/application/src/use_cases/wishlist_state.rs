//! Observable wishlist mirror kept in sync with the backend.

use std::sync::Arc;

use snapshop_domain::{Product, Wishlist};
use tokio::sync::watch;
use tracing::debug;

use super::WishlistOperations;
use crate::error::{OperationError, OperationResult};

/// Local copy of the wishlist, changed only after the backend confirms.
#[derive(Debug, Clone)]
pub struct WishlistState {
    sender: Arc<watch::Sender<Wishlist>>,
    operations: WishlistOperations,
}

impl WishlistState {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new(operations: WishlistOperations) -> Self {
        let (sender, _) = watch::channel(Wishlist::new());
        Self {
            sender: Arc::new(sender),
            operations,
        }
    }

    /// Current mirror contents.
    #[must_use]
    pub fn snapshot(&self) -> Wishlist {
        self.sender.borrow().clone()
    }

    /// Receiver notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Wishlist> {
        self.sender.subscribe()
    }

    /// Replaces the mirror with the remote list.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure; the mirror is left unchanged unless the
    /// session expired, in which case it is cleared.
    pub async fn refresh(&self) -> OperationResult<usize> {
        let items = self.operations.fetch().await.map_err(|e| self.on_error(e))?;
        let wishlist = Wishlist::from_items(items);
        let count = wishlist.len();
        self.sender.send_replace(wishlist);
        debug!(count, "wishlist mirror refreshed");
        Ok(count)
    }

    /// Adds a product remotely, then mirrors it.
    ///
    /// Returns `false` without a request when the id is already mirrored.
    ///
    /// # Errors
    ///
    /// Propagates the add failure; the mirror is not touched.
    pub async fn add(&self, product: Product) -> OperationResult<bool> {
        if self.sender.borrow().contains(&product.id) {
            debug!(item_id = %product.id, "already in wishlist");
            return Ok(false);
        }
        self.operations
            .add(&product)
            .await
            .map_err(|e| self.on_error(e))?;
        Ok(self.sender.send_if_modified(|wishlist| wishlist.insert(product)))
    }

    /// Removes a product remotely, then from the mirror.
    ///
    /// # Errors
    ///
    /// Propagates the remove failure; the mirror is not touched.
    pub async fn remove(&self, item_id: &str) -> OperationResult<()> {
        self.operations
            .remove(item_id)
            .await
            .map_err(|e| self.on_error(e))?;
        self.sender
            .send_if_modified(|wishlist| wishlist.remove(item_id).is_some());
        Ok(())
    }

    /// Empties the mirror without contacting the backend.
    pub fn clear(&self) {
        self.sender.send_if_modified(|wishlist| {
            let changed = !wishlist.is_empty();
            wishlist.clear();
            changed
        });
    }

    fn on_error(&self, error: OperationError) -> OperationError {
        if error.is_session_expired() {
            self.clear();
        }
        error
    }
}
