//! Client-side list engines.
//!
//! Three structurally identical lists, each owned by exactly one engine per
//! session and mirrored to durable client storage:
//!
//! - [`Cart`] - stock-aware quantities and totals
//! - [`Compare`] - at most [`MAX_COMPARE_ITEMS`] distinct products
//! - [`Favorites`] - unbounded set of distinct products
//!
//! All of them are built on [`PersistentList`]. Consumers observe changes
//! through `subscribe()`; a receiver sees the new list as soon as the
//! mutating call returns.

mod cart;
mod compare;
mod favorites;
mod persistent;

pub use cart::{Cart, CartEntry};
pub use compare::{Compare, MAX_COMPARE_ITEMS};
pub use favorites::Favorites;
pub use persistent::{Keyed, ListReceiver, PersistentList, STORAGE_VERSION};
