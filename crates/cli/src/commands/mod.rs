//! Command implementations.
//!
//! Every command receives a [`Context`]: the loaded configuration, the
//! hydrated [`ShopSession`] for the profile, and the catalog to look
//! products up in.

pub mod cart;
pub mod compare;
pub mod favorites;
pub mod order;
pub mod products;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use breeze_core::{Locale, Product, ProductId};
use breeze_storefront::catalog::{CatalogClient, CatalogError, ProductSource, StaticCatalog};
use breeze_storefront::config::StorefrontConfig;
use breeze_storefront::format::format_price;
use breeze_storefront::storage::{FileStorage, StorageError};
use breeze_storefront::{AppError, Result, ShopSession};
use rust_decimal::Decimal;

/// Where product snapshots come from.
pub enum Catalog {
    Static(StaticCatalog),
    Remote(CatalogClient),
}

impl ProductSource for Catalog {
    async fn product(&self, id: &ProductId) -> std::result::Result<Product, CatalogError> {
        match self {
            Self::Static(catalog) => catalog.product(id).await,
            Self::Remote(client) => client.product(id).await,
        }
    }

    async fn products(&self) -> std::result::Result<Vec<Product>, CatalogError> {
        match self {
            Self::Static(catalog) => catalog.products().await,
            Self::Remote(client) => client.products().await,
        }
    }
}

/// Everything a command needs.
pub struct Context {
    pub config: StorefrontConfig,
    pub session: ShopSession,
    catalog: Option<Catalog>,
}

impl Context {
    /// Load configuration, open the profile and hydrate the session.
    ///
    /// `catalog_file` takes precedence over the backend. Without either,
    /// commands that need product data fail, but everything that only reads
    /// or edits the stored lists still works.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the profile
    /// directory cannot be created, or the catalog file cannot be read.
    pub fn load(
        catalog_file: Option<&Path>,
        profile: Option<PathBuf>,
        locale: Option<Locale>,
    ) -> Result<Self> {
        let mut config = StorefrontConfig::from_env()?;
        if let Some(profile) = profile {
            config.profile_dir = profile;
        }
        if let Some(locale) = locale {
            config.locale = locale;
        }

        std::fs::create_dir_all(&config.profile_dir).map_err(StorageError::from)?;
        let storage = FileStorage::in_profile(&config.profile_dir);
        tracing::debug!(path = %storage.path().display(), "Opened profile");
        let session = ShopSession::load(Arc::new(storage));

        let catalog = match (catalog_file, &config.backend) {
            (Some(path), _) => Some(Catalog::Static(StaticCatalog::from_file(path)?)),
            (None, Some(backend)) => Some(Catalog::Remote(CatalogClient::new(
                backend,
                config.catalog_cache_ttl,
            )?)),
            (None, None) => None,
        };

        Ok(Self {
            config,
            session,
            catalog,
        })
    }

    /// The configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `--catalog` nor a backend is configured.
    pub fn catalog(&self) -> Result<&Catalog> {
        self.catalog.as_ref().ok_or_else(|| {
            AppError::BadRequest(
                "no catalog: pass --catalog <file.json> or set BACKEND_URL".to_string(),
            )
        })
    }

    /// Look up a product snapshot by id.
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is configured or the lookup fails.
    pub async fn product(&self, id: &str) -> Result<Product> {
        Ok(self.catalog()?.product(&ProductId::new(id)).await?)
    }

    /// Format an amount in the configured currency and language.
    #[must_use]
    pub fn price(&self, amount: Decimal) -> String {
        format_price(amount, self.config.currency, self.config.locale)
    }

    /// Product name in the configured language.
    #[must_use]
    pub fn name<'a>(&self, product: &'a Product) -> &'a str {
        product.name(self.config.locale)
    }
}

/// Stock column text.
#[must_use]
pub fn stock_label(product: &Product) -> String {
    product
        .inventory
        .map_or_else(|| "-".to_string(), |stock| stock.to_string())
}
