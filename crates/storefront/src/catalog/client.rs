//! Hosted backend catalog client.
//!
//! Reads the `products` table through the backend's REST interface
//! (`GET {BACKEND_URL}/rest/v1/products?select=*`). Responses are cached
//! with `moka` for the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use breeze_core::{Product, ProductId};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogError, ProductSource};
use crate::config::BackendConfig;

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    All,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client for the hosted product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: Url,
    api_key: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("products_url", &self.inner.products_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a catalog client for `backend`, caching responses for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if the backend URL cannot be
    /// extended with the REST path.
    pub fn new(backend: &BackendConfig, ttl: Duration) -> Result<Self, CatalogError> {
        let cache = Cache::builder().max_capacity(1000).time_to_live(ttl).build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                products_url: backend.rest_url("products")?,
                api_key: backend.anon_key.clone(),
                cache,
            }),
        })
    }

    /// Drop every cached response.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    fn product_url(&self, id: &ProductId) -> Url {
        let mut url = self.inner.products_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"));
        url
    }

    fn list_url(&self) -> Url {
        let mut url = self.inner.products_url.clone();
        url.query_pairs_mut().append_pair("select", "*");
        url
    }

    /// Fetch product rows from `url`.
    async fn fetch(&self, url: Url) -> Result<Vec<Product>, CatalogError> {
        let key = self.inner.api_key.expose_secret();
        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl ProductSource for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .fetch(self.product_url(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::All).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let products = self.fetch(self.list_url()).await?;
        debug!(count = products.len(), "Fetched catalog");

        for product in &products {
            self.inner
                .cache
                .insert(
                    CacheKey::Product(product.id.clone()),
                    CacheValue::Product(Box::new(product.clone())),
                )
                .await;
        }
        self.inner
            .cache
            .insert(CacheKey::All, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Nothing listens on the discard port, so any request that reaches the
    // network fails fast.
    fn client() -> CatalogClient {
        let backend = BackendConfig {
            url: Url::parse("http://127.0.0.1:9").unwrap(),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7rT0uW4zC6"),
            order_notify_url: None,
        };
        CatalogClient::new(&backend, Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.list_url().as_str(),
            "http://127.0.0.1:9/rest/v1/products?select=*"
        );
        assert_eq!(
            client.product_url(&ProductId::new("split 18k")).as_str(),
            "http://127.0.0.1:9/rest/v1/products?select=*&id=eq.split+18k"
        );
    }

    #[tokio::test]
    async fn test_cached_product_skips_network() {
        let client = client();
        let product = Product::new("split-18k").with_inventory(4);
        client
            .inner
            .cache
            .insert(
                CacheKey::Product(product.id.clone()),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;

        let found = client.product(&product.id).await.unwrap();
        assert_eq!(found, product);
    }

    #[tokio::test]
    async fn test_uncached_product_reports_http_error() {
        let client = client();
        client.invalidate();
        let result = client.product(&ProductId::new("split-18k")).await;
        assert!(matches!(result, Err(CatalogError::Http(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug_output = format!("{:?}", client());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("eyJhbGci"));
    }
}
