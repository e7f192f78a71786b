//! Product comparison list.
//!
//! Holds up to [`MAX_COMPARE_ITEMS`] distinct products in the order they were
//! added. Adding a duplicate or adding past capacity is silently ignored.
//! Prompting for a second product or opening the comparison view is up to
//! the caller, based on [`Compare::len`] before and after an add.

use std::sync::Arc;

use breeze_core::{Product, ProductId};

use super::persistent::{ListReceiver, PersistentList};
use crate::storage::ClientStorage;

/// Most products that can be compared side by side.
pub const MAX_COMPARE_ITEMS: usize = 4;

/// The shopper's comparison list.
#[derive(Debug)]
pub struct Compare {
    products: PersistentList<Product>,
}

impl Compare {
    /// Storage key the compare list is persisted under.
    pub const STORAGE_KEY: &'static str = "breeze.compare";

    /// Hydrate the compare list from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        let products = PersistentList::load_with(Self::STORAGE_KEY, storage, |mut products| {
            products.truncate(MAX_COMPARE_ITEMS);
            products
        });
        Self { products }
    }

    /// Append `product` unless it is already present or the list is full.
    pub fn add(&self, product: &Product) {
        self.products.mutate(|products| {
            if products.len() >= MAX_COMPARE_ITEMS
                || products.iter().any(|p| p.id == product.id)
            {
                return false;
            }
            products.push(product.clone());
            true
        });
    }

    /// Remove `id`. Unknown ids are ignored.
    pub fn remove(&self, id: &ProductId) {
        self.products.remove(id);
    }

    /// Remove every product.
    pub fn clear(&self) {
        self.products.clear();
    }

    /// Whether `id` is being compared.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains(id)
    }

    /// Whether another product can be added.
    #[must_use]
    pub fn can_add_more(&self) -> bool {
        self.products.len() < MAX_COMPARE_ITEMS
    }

    /// Products in the order they were added.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.snapshot()
    }

    /// Number of products being compared.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether nothing is being compared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Subscribe to compare list changes.
    #[must_use]
    pub fn subscribe(&self) -> ListReceiver<Product> {
        self.products.subscribe()
    }
}
