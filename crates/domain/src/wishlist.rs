//! Client-side wishlist mirror

use crate::product::Product;

/// Cached copy of the user's saved products.
///
/// Keeps insertion order and holds at most one entry per product id. The
/// remote store is the source of truth; this is refreshed on login and
/// mutated after confirmed add/remove calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    /// Creates an empty mirror.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Builds a mirror from a remote listing, dropping duplicate ids.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Product>) -> Self {
        let mut wishlist = Self::new();
        for item in items {
            wishlist.insert(item);
        }
        wishlist
    }

    /// Returns true if a product with this id is mirrored.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Adds a product. Returns false and leaves the mirror untouched when the
    /// id is already present.
    pub fn insert(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Removes a product by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let index = self.items.iter().position(|p| p.id == id)?;
        Some(self.items.remove(index))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Mirrored products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Number of mirrored products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is mirrored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
