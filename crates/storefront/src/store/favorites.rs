//! Favorites (wish list).

use std::sync::Arc;

use breeze_core::{Product, ProductId};

use super::persistent::{ListReceiver, PersistentList};
use crate::storage::ClientStorage;

/// Products the shopper marked as favorites, in the order they were added.
#[derive(Debug)]
pub struct Favorites {
    products: PersistentList<Product>,
}

impl Favorites {
    /// Storage key the favorites are persisted under.
    pub const STORAGE_KEY: &'static str = "breeze.favorites";

    /// Hydrate the favorites from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            products: PersistentList::load(Self::STORAGE_KEY, storage),
        }
    }

    /// Append `product` unless it is already a favorite.
    pub fn add(&self, product: &Product) {
        self.products.mutate(|products| {
            if products.iter().any(|p| p.id == product.id) {
                return false;
            }
            products.push(product.clone());
            true
        });
    }

    /// Add `product` if absent, remove it otherwise.
    pub fn toggle(&self, product: &Product) {
        if self.contains(&product.id) {
            self.remove(&product.id);
        } else {
            self.add(product);
        }
    }

    /// Remove `id`. Unknown ids are ignored.
    pub fn remove(&self, id: &ProductId) {
        self.products.remove(id);
    }

    /// Remove every favorite.
    pub fn clear(&self) {
        self.products.clear();
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains(id)
    }

    /// Favorites in the order they were added.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.snapshot()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Subscribe to favorites changes.
    #[must_use]
    pub fn subscribe(&self) -> ListReceiver<Product> {
        self.products.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_add_twice_keeps_one() {
        let favorites = Favorites::load(Arc::new(MemoryStorage::new()));
        favorites.add(&Product::new("A"));
        favorites.add(&Product::new("A"));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_no_capacity_limit() {
        let favorites = Favorites::load(Arc::new(MemoryStorage::new()));
        for i in 0..25 {
            favorites.add(&Product::new(format!("p{i}")));
        }
        assert_eq!(favorites.len(), 25);
        assert_eq!(favorites.products()[0].id.as_str(), "p0");
    }

    #[test]
    fn test_toggle() {
        let storage = Arc::new(MemoryStorage::new());
        let favorites = Favorites::load(storage.clone());
        let product = Product::new("A");

        favorites.toggle(&product);
        assert!(favorites.contains(&product.id));
        favorites.toggle(&product);
        assert!(!favorites.contains(&product.id));
        assert!(!storage.contains(Favorites::STORAGE_KEY));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let favorites = Favorites::load(Arc::new(MemoryStorage::new()));
        favorites.add(&Product::new("A"));
        favorites.remove(&ProductId::new("B"));
        assert_eq!(favorites.len(), 1);
    }
}
