//! Product catalog readers.
//!
//! The catalog is the external read model the list engines take product
//! snapshots from. Two sources implement [`ProductSource`]:
//!
//! - [`CatalogClient`] - the hosted backend's `products` REST table, cached
//!   in memory via `moka`
//! - [`StaticCatalog`] - a fixed product list, loaded from JSON
//!
//! The engines never talk to a catalog themselves. Callers look a product up
//! and hand the snapshot to `Cart::add`, `Compare::add` or `Favorites::add`.

mod client;
mod fixed;

use std::future::Future;

use breeze_core::{Product, ProductId};
use thiserror::Error;

pub use client::CatalogClient;
pub use fixed::StaticCatalog;

/// Errors that can occur when reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No product with the requested id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Response or catalog file could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend URL cannot address the REST table.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Catalog file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of product snapshots.
pub trait ProductSource: Send + Sync {
    /// Look up a single product.
    fn product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// List every product, in catalog order.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}
