//! Durable client storage.
//!
//! The storefront keeps the shopper's cart, compare list and favorites in a
//! small string key/value store that survives restarts of the client, the
//! same role `localStorage` plays for a browser profile. Values are opaque
//! strings; the list engines in [`crate::store`] own their serialization.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, for tests and throwaway sessions
//! - [`FileStorage`] - one JSON document per profile, written atomically
//!
//! Reads never fail: a missing key and an unreadable backend both read as
//! `None`. Writes report failures so callers can log them, but the list
//! engines treat every write as best-effort.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when writing to client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the storage document failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the write (quota, read-only profile, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store scoped to one client profile.
///
/// Implementations must be `Send + Sync`; a single handle is shared by every
/// list engine of a session.
pub trait ClientStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the removal.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}
