//! Integration tests for the Breeze storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p breeze-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart engine behavior through a full session
//! - `compare_favorites` - Compare and favorites lists
//! - `persistence` - File-backed profiles, reloads, damaged storage
//! - `notification` - Change propagation between views of one session
//! - `checkout` - Order intake against recording sinks
//!
//! Everything runs offline. Profiles live in temporary directories.

use std::path::Path;
use std::sync::Arc;

use breeze_core::{Price, Product};
use breeze_storefront::ShopSession;
use breeze_storefront::catalog::StaticCatalog;
use breeze_storefront::storage::FileStorage;
use tempfile::TempDir;

/// A small air-conditioner catalog.
pub const CATALOG_JSON: &str = r#"[
    {"id": "split-18k", "name_en": "Split AC 18000 BTU", "name_ar": "مكيف سبليت 18000 وحدة", "price": "2350.00", "inventory": 2, "btu": 18000, "brand": "Gree"},
    {"id": "split-24k", "name_en": "Split AC 24000 BTU", "name_ar": "مكيف سبليت 24000 وحدة", "price": "2999.00", "inventory": 5, "btu": 24000, "brand": "LG"},
    {"id": "window-12k", "name_en": "Window AC 12000 BTU", "name_ar": "مكيف شباك 12000 وحدة", "price": "1199.00", "btu": 12000},
    {"id": "portable-9k", "name_en": "Portable AC", "name_ar": "مكيف متنقل", "price": 899, "inventory": 0},
    {"id": "cassette-36k", "name_en": "Cassette AC", "name_ar": "مكيف كاسيت", "price": "6450.50", "inventory": 1},
    {"id": "filter", "name_en": "Replacement Filter", "name_ar": "فلتر بديل"}
]"#;

/// The fixture catalog.
#[must_use]
pub fn catalog() -> StaticCatalog {
    StaticCatalog::from_json(CATALOG_JSON).expect("fixture catalog is valid JSON")
}

/// Build a product with a whole-unit price and optional stock.
#[must_use]
pub fn product(id: &str, price: u32, inventory: Option<u32>) -> Product {
    let product = Product::new(id).with_price(Price::from_units(price));
    match inventory {
        Some(stock) => product.with_inventory(stock),
        None => product,
    }
}

/// A file-backed client profile in a temporary directory.
///
/// Each call to [`TestProfile::session`] opens the profile afresh, like a new
/// page load in the same browser profile.
pub struct TestProfile {
    dir: TempDir,
}

impl TestProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create profile directory"),
        }
    }

    /// Profile directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open the profile storage.
    #[must_use]
    pub fn storage(&self) -> Arc<FileStorage> {
        Arc::new(FileStorage::in_profile(self.dir.path()))
    }

    /// Hydrate a new session from the profile.
    #[must_use]
    pub fn session(&self) -> ShopSession {
        ShopSession::load(self.storage())
    }

    /// The raw storage document, or `None` if nothing was written yet.
    #[must_use]
    pub fn document(&self) -> Option<serde_json::Value> {
        let contents = std::fs::read_to_string(self.dir.path().join(FileStorage::FILE_NAME)).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::new()
    }
}
