//! Shopping cart engine.
//!
//! One [`CartEntry`] per product id. Quantities are always at least one: an
//! entry driven to zero is removed, never kept. Stock limits come from the
//! product snapshot stored in the entry, not from the live catalog.
//!
//! None of the operations fail. Invalid requests (zero quantities, amounts
//! beyond stock, unknown ids) are silent no-ops or clamps; callers that want
//! to warn the shopper compare the resulting state with what they asked for.

use std::sync::Arc;

use breeze_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::persistent::{Keyed, ListReceiver, PersistentList};
use crate::storage::ClientStorage;

/// A cart line: a product snapshot and how many units the shopper wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product as it was when first added.
    pub product: Product,
    /// Units, always `>= 1`.
    pub quantity: u32,
}

impl CartEntry {
    /// Price of the line (`unit price * quantity`, absent price as zero).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.unit_price().amount() * Decimal::from(self.quantity)
    }
}

impl Keyed for CartEntry {
    fn key(&self) -> &ProductId {
        &self.product.id
    }
}

/// The shopper's cart.
#[derive(Debug)]
pub struct Cart {
    entries: PersistentList<CartEntry>,
}

impl Cart {
    /// Storage key the cart is persisted under.
    pub const STORAGE_KEY: &'static str = "breeze.cart";

    /// Hydrate the cart from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        let entries = PersistentList::load_with(Self::STORAGE_KEY, storage, |entries| {
            entries
                .into_iter()
                .filter(|entry: &CartEntry| entry.quantity > 0)
                .collect()
        });
        Self { entries }
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product not yet in the cart is inserted with `quantity` as-is, even
    /// when that exceeds its stock. For a product already in the cart the
    /// combined quantity must fit the stock recorded in the cart entry;
    /// otherwise nothing changes (no partial increment). Adding zero units
    /// does nothing.
    pub fn add(&self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        let changed = self.entries.mutate(|entries| {
            match entries.iter_mut().find(|entry| entry.product.id == product.id) {
                Some(entry) => {
                    let combined = u64::from(entry.quantity) + u64::from(quantity);
                    if !entry.product.capacity().admits(combined) {
                        return false;
                    }
                    match u32::try_from(combined) {
                        Ok(combined) => {
                            entry.quantity = combined;
                            true
                        }
                        Err(_) => false,
                    }
                }
                None => {
                    entries.push(CartEntry {
                        product: product.clone(),
                        quantity,
                    });
                    true
                }
            }
        });

        if !changed {
            tracing::debug!(product_id = %product.id, quantity, "Add to cart exceeds stock, ignored");
        }
    }

    /// Remove the entry for `id`. Unknown ids are ignored.
    pub fn remove(&self, id: &ProductId) {
        self.entries.remove(id);
    }

    /// Set the quantity of the entry for `id`.
    ///
    /// Zero or negative quantities remove the entry. Larger quantities are
    /// clamped to the stock recorded in the entry. Unknown ids are ignored.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.entries.mutate(|entries| {
            let Some(index) = entries.iter().position(|entry| &entry.product.id == id) else {
                return false;
            };
            let Some(entry) = entries.get_mut(index) else {
                return false;
            };
            let clamped = entry.product.capacity().clamp(requested);
            if clamped == 0 {
                // Sold out snapshot: a zero line is never kept.
                entries.remove(index);
                return true;
            }
            if clamped == entry.quantity {
                return false;
            }
            entry.quantity = clamped;
            true
        });
    }

    /// Remove the entries for every id in `ids`, in one change. Unknown ids
    /// are ignored.
    pub fn remove_all(&self, ids: &[ProductId]) {
        self.entries.mutate(|entries| {
            let before = entries.len();
            entries.retain(|entry| !ids.contains(&entry.product.id));
            entries.len() != before
        });
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Total units across all entries.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.entries
            .read(|entries| entries.iter().map(|entry| u64::from(entry.quantity)).sum())
    }

    /// Sum of every line total.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.entries
            .read(|entries| entries.iter().map(CartEntry::line_total).sum())
    }

    /// Whether `id` is in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.contains(id)
    }

    /// The entry for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<CartEntry> {
        self.entries.find(id)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        self.entries.snapshot()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe to cart changes.
    #[must_use]
    pub fn subscribe(&self) -> ListReceiver<CartEntry> {
        self.entries.subscribe()
    }
}
