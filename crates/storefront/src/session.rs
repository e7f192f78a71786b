//! Per-session shopping state shared across every view of the client.

use std::sync::Arc;

use crate::storage::ClientStorage;
use crate::store::{Cart, Compare, Favorites};

/// Shopping state for one client session.
///
/// Build exactly one per session and hand out clones; every clone refers to
/// the same cart, compare list and favorites, so a change made through one
/// view is immediately visible to all others. Two sessions built over the
/// same storage do not see each other's changes until one of them is
/// rebuilt (reloaded).
#[derive(Clone, Debug)]
pub struct ShopSession {
    inner: Arc<ShopSessionInner>,
}

#[derive(Debug)]
struct ShopSessionInner {
    cart: Cart,
    compare: Compare,
    favorites: Favorites,
}

impl ShopSession {
    /// Hydrate a session from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            inner: Arc::new(ShopSessionInner {
                cart: Cart::load(Arc::clone(&storage)),
                compare: Compare::load(Arc::clone(&storage)),
                favorites: Favorites::load(storage),
            }),
        }
    }

    /// The shopper's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.inner.cart
    }

    /// The comparison list.
    #[must_use]
    pub fn compare(&self) -> &Compare {
        &self.inner.compare
    }

    /// The favorites.
    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.inner.favorites
    }
}
