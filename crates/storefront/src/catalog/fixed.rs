//! In-memory catalog.

use std::path::Path;
use std::sync::Arc;

use breeze_core::{Product, ProductId};

use super::{CatalogError, ProductSource};

/// A catalog backed by a fixed list of products.
///
/// Used for offline sessions (`breeze --catalog products.json`) and tests.
/// Lookups are linear; catalogs loaded this way are small.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Arc<Vec<Product>>,
}

impl StaticCatalog {
    /// Create a catalog from `products`. Later duplicates of an id are shadowed
    /// by the first occurrence.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Parse a catalog from a JSON array of product rows.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON is not an array of products.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Read a catalog file containing a JSON array of product rows.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or
    /// `CatalogError::Parse` if its contents are not a product array.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&contents)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            products = catalog.products.len(),
            "Loaded static catalog"
        );
        Ok(catalog)
    }

    fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }
}

impl ProductSource for StaticCatalog {
    async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.find(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.as_ref().clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"id": "split-18k", "name_en": "Split AC 18000 BTU", "name_ar": "مكيف سبليت 18000 وحدة", "price": "2350.00", "inventory": 3, "category": "split"},
        {"id": "window-12k", "name_en": "Window AC 12000 BTU", "price": 1199}
    ]"#;

    #[tokio::test]
    async fn test_lookup() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();

        let split = catalog.product(&ProductId::new("split-18k")).await.unwrap();
        assert_eq!(split.inventory, Some(3));
        assert_eq!(split.extra.get("category").unwrap(), "split");

        let missing = catalog.product(&ProductId::new("nope")).await;
        assert!(matches!(missing, Err(CatalogError::NotFound(id)) if id.as_str() == "nope"));
    }

    #[tokio::test]
    async fn test_products_keep_order() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let ids: Vec<_> = catalog
            .products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, ["split-18k", "window-12k"]);
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            StaticCatalog::from_json(r#"{"id": "a"}"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.products().await.unwrap().len(), 2);

        let missing = StaticCatalog::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }
}
