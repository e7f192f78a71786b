//! Breeze storefront client library.
//!
//! Client-side shopping state for the Breeze air-conditioning store: the
//! cart, the comparison list and favorites, each mirrored to durable client
//! storage and observable by every view of the session. Around them sit the
//! catalog reader, order intake, configuration and price display.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use breeze_core::{Price, Product};
//! use breeze_storefront::{ShopSession, storage::MemoryStorage};
//!
//! let session = ShopSession::load(Arc::new(MemoryStorage::new()));
//! let product = Product::new("split-18k")
//!     .with_price(Price::from_units(100))
//!     .with_inventory(2);
//!
//! session.cart().add(&product, 1);
//! session.cart().add(&product, 1);
//! session.cart().add(&product, 1); // exceeds stock, ignored
//! assert_eq!(session.cart().total_items(), 2);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod orders;
pub mod session;
pub mod storage;
pub mod store;

pub use error::{AppError, Result};
pub use session::ShopSession;
