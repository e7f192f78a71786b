//! Unified error handling.
//!
//! The list engines never fail; everything around them (configuration,
//! catalog reads, order intake, storage setup) reports through [`AppError`]
//! so the outer surfaces can handle one error type.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::orders::{ContactError, OrderError};
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog read failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order could not be placed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Client storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid input from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        Self::Order(OrderError::Contact(err))
    }
}

impl AppError {
    /// Whether the shopper can fix this by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_)
                | Self::Order(OrderError::EmptyCart | OrderError::Contact(_))
                | Self::Catalog(CatalogError::NotFound(_))
        )
    }
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, AppError>;
