//! Persistent list primitive shared by the cart, compare and favorites engines.
//!
//! A [`PersistentList`] owns one list for the whole client session. It is
//! hydrated from [`ClientStorage`] when constructed, read through a
//! `tokio::sync::watch` channel, and written back in full after every change.
//! An empty list is never stored: its key is deleted instead.
//!
//! # Storage format
//!
//! ```json
//! {"version": 1, "items": [ ... ]}
//! ```
//!
//! A bare JSON array (the unversioned layout) is still accepted on load and
//! rewritten in the versioned form.

use std::collections::HashSet;
use std::sync::Arc;

use breeze_core::{Product, ProductId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::storage::ClientStorage;

/// Current version of the persisted envelope.
pub const STORAGE_VERSION: u32 = 1;

/// An entry that is identified by a product id.
pub trait Keyed {
    /// The product id this entry is keyed by.
    fn key(&self) -> &ProductId;
}

impl Keyed for Product {
    fn key(&self) -> &ProductId {
        &self.id
    }
}

/// Receiver half handed to list subscribers.
pub type ListReceiver<T> = watch::Receiver<Vec<T>>;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored<T> {
    Envelope { version: u32, items: Vec<T> },
    Legacy(Vec<T>),
}

/// A list of keyed entries mirrored to durable client storage.
pub struct PersistentList<T> {
    key: &'static str,
    storage: Arc<dyn ClientStorage>,
    items: watch::Sender<Vec<T>>,
}

impl<T> PersistentList<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned,
{
    /// Hydrate the list stored under `key`.
    ///
    /// Missing, unparseable or unsupported data yields an empty list; nothing
    /// is raised to the caller.
    #[must_use]
    pub fn load(key: &'static str, storage: Arc<dyn ClientStorage>) -> Self {
        Self::load_with(key, storage, |items| items)
    }

    /// Hydrate the list stored under `key`, passing the decoded entries
    /// through `normalize` so the caller can enforce its own invariants on
    /// data written by older or tampered clients.
    ///
    /// Entries with a repeated product id are dropped (first one wins) before
    /// `normalize` runs.
    #[must_use]
    pub fn load_with(
        key: &'static str,
        storage: Arc<dyn ClientStorage>,
        normalize: impl FnOnce(Vec<T>) -> Vec<T>,
    ) -> Self {
        let (items, rewrite) = hydrate(key, storage.as_ref(), normalize);
        if rewrite {
            persist(key, storage.as_ref(), &items);
        }
        let (items, _) = watch::channel(items);
        Self {
            key,
            storage,
            items,
        }
    }

    /// The storage key this list is persisted under.
    #[must_use]
    pub const fn storage_key(&self) -> &'static str {
        self.key
    }

    /// Subscribe to changes. The receiver always observes the latest list.
    #[must_use]
    pub fn subscribe(&self) -> ListReceiver<T> {
        self.items.subscribe()
    }

    /// Run `f` against the current entries.
    ///
    /// The list is read-locked while `f` runs, so `f` must not call back into
    /// a mutating operation of the same list.
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.borrow())
    }

    /// Clone of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Whether an entry for `id` exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.borrow().iter().any(|item| item.key() == id)
    }

    /// Clone of the entry for `id`, if any.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<T> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.key() == id)
            .cloned()
    }

    /// Apply `change` to the list.
    ///
    /// `change` returns whether it modified the list. Only then is the list
    /// persisted and subscribers notified, in that order. Returns the same
    /// flag.
    pub fn mutate(&self, change: impl FnOnce(&mut Vec<T>) -> bool) -> bool {
        self.items.send_if_modified(|items| {
            let changed = change(items);
            if changed {
                persist(self.key, self.storage.as_ref(), items);
            }
            changed
        })
    }

    /// Remove the entry for `id`. Missing ids are a no-op.
    pub fn remove(&self, id: &ProductId) -> bool {
        self.mutate(|items| {
            let before = items.len();
            items.retain(|item| item.key() != id);
            items.len() != before
        })
    }

    /// Remove every entry.
    pub fn clear(&self) -> bool {
        self.mutate(|items| {
            let had_items = !items.is_empty();
            items.clear();
            had_items
        })
    }
}

impl<T> std::fmt::Debug for PersistentList<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentList")
            .field("key", &self.key)
            .field("items", &*self.items.borrow())
            .finish_non_exhaustive()
    }
}

/// Decode the stored list. Returns the entries and whether storage should be
/// rewritten (unusable data, legacy layout, or entries dropped on load).
fn hydrate<T>(
    key: &str,
    storage: &dyn ClientStorage,
    normalize: impl FnOnce(Vec<T>) -> Vec<T>,
) -> (Vec<T>, bool)
where
    T: Keyed + DeserializeOwned,
{
    let Some(raw) = storage.get(key) else {
        return (Vec::new(), false);
    };

    let (decoded, legacy) = match serde_json::from_str::<Stored<T>>(&raw) {
        Ok(Stored::Envelope { version, items }) if version == STORAGE_VERSION => (items, false),
        Ok(Stored::Envelope { version, .. }) => {
            tracing::warn!(key, version, "Unsupported stored list version, starting empty");
            return (Vec::new(), true);
        }
        Ok(Stored::Legacy(items)) => (items, true),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable stored list");
            return (Vec::new(), true);
        }
    };

    let decoded_len = decoded.len();
    let mut seen = HashSet::new();
    let unique: Vec<T> = decoded
        .into_iter()
        .filter(|item| seen.insert(item.key().clone()))
        .collect();
    let items = normalize(unique);

    if items.len() != decoded_len {
        tracing::warn!(
            key,
            stored = decoded_len,
            kept = items.len(),
            "Dropped invalid entries from stored list"
        );
    }

    let rewrite = legacy || items.len() != decoded_len;
    (items, rewrite)
}

/// Write `items` under `key`, or delete the key when `items` is empty.
///
/// Failures are logged and swallowed: the in-memory list stays authoritative
/// for the rest of the session.
fn persist<T: Serialize>(key: &str, storage: &dyn ClientStorage, items: &[T]) {
    let result = if items.is_empty() {
        storage.delete(key)
    } else {
        let envelope = EnvelopeRef {
            version: STORAGE_VERSION,
            items,
        };
        serde_json::to_string(&envelope)
            .map_err(Into::into)
            .and_then(|body| storage.set(key, &body))
    };

    match result {
        Ok(()) => tracing::debug!(key, len = items.len(), "Persisted list"),
        Err(e) => tracing::error!(key, error = %e, "Failed to persist list, keeping in-memory state"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    const KEY: &str = "test.list";

    fn storage() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    fn list(storage: &Arc<MemoryStorage>) -> PersistentList<Product> {
        PersistentList::load(KEY, storage.clone())
    }

    struct ReadOnlyStorage {
        inner: MemoryStorage,
    }

    impl ClientStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn delete(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only profile".to_string()))
        }
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let storage = storage();
        let list = list(&storage);
        assert!(list.is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_unparseable_value_loads_empty_and_is_removed() {
        let storage = storage();
        storage.set(KEY, "{\"items\": oops").unwrap();

        let list = list(&storage);
        assert!(list.is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_unknown_version_loads_empty() {
        let storage = storage();
        storage
            .set(KEY, r#"{"version":99,"items":[{"id":"a"}]}"#)
            .unwrap();

        assert!(list(&storage).is_empty());
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_legacy_array_is_upgraded() {
        let storage = storage();
        storage.set(KEY, r#"[{"id":"a"},{"id":"b"}]"#).unwrap();

        let list = list(&storage);
        assert_eq!(list.len(), 2);

        let stored: serde_json::Value =
            serde_json::from_str(&storage.get(KEY).unwrap()).unwrap();
        assert_eq!(stored["version"], STORAGE_VERSION);
        assert_eq!(stored["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_dropped_on_load() {
        let storage = storage();
        storage
            .set(
                KEY,
                r#"{"version":1,"items":[{"id":"a","name_en":"first"},{"id":"a","name_en":"second"}]}"#,
            )
            .unwrap();

        let list = list(&storage);
        assert_eq!(list.len(), 1);
        assert_eq!(list.snapshot()[0].name_en, "first");
    }

    #[test]
    fn test_mutation_persists_and_reload_matches() {
        let storage = storage();
        let first = list(&storage);
        first.mutate(|items| {
            items.push(Product::new("a").with_inventory(3));
            items.push(Product::new("b"));
            true
        });

        let reloaded = list(&storage);
        assert_eq!(reloaded.snapshot(), first.snapshot());
    }

    #[test]
    fn test_empty_list_deletes_key() {
        let storage = storage();
        let list = list(&storage);
        list.mutate(|items| {
            items.push(Product::new("a"));
            true
        });
        assert!(storage.contains(KEY));

        assert!(list.remove(&ProductId::new("a")));
        assert!(!storage.contains(KEY));
    }

    #[test]
    fn test_unchanged_mutation_does_not_notify() {
        let storage = storage();
        let list = list(&storage);
        let mut rx = list.subscribe();

        assert!(!list.remove(&ProductId::new("missing")));
        assert!(!rx.has_changed().unwrap());

        list.mutate(|items| {
            items.push(Product::new("a"));
            true
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = Arc::new(ReadOnlyStorage {
            inner: MemoryStorage::new(),
        });
        let list: PersistentList<Product> = PersistentList::load(KEY, storage.clone());

        assert!(list.mutate(|items| {
            items.push(Product::new("a"));
            true
        }));
        assert!(list.contains(&ProductId::new("a")));
        assert!(storage.get(KEY).is_none());

        assert!(list.clear());
        assert!(list.is_empty());
    }
}
