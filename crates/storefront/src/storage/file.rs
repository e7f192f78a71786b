//! File-backed client storage.
//!
//! The whole profile is a single JSON object (`{"key": "value", ...}`). Reads
//! come from the copy loaded when the storage was opened. Every change
//! re-reads the document, replaces the one key and writes it back via a
//! sibling temp file and a rename, so a crash mid-write never leaves a
//! truncated document behind.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{ClientStorage, StorageError};

/// Key/value storage persisted to one JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// File name used inside a profile directory.
    pub const FILE_NAME: &'static str = "local_storage.json";

    /// Open the storage document at `path`.
    ///
    /// A missing file opens as empty storage. An unreadable or malformed file
    /// is logged and also opens as empty; it is replaced on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_document(&path);
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened client storage");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Open the storage document inside a profile directory.
    #[must_use]
    pub fn in_profile(dir: impl AsRef<Path>) -> Self {
        Self::open(dir.as_ref().join(Self::FILE_NAME))
    }

    /// Location of the storage document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to the document on disk and write it back.
    ///
    /// The document is re-read under the lock so keys written by other
    /// handles on the same profile since this one was opened are kept; only
    /// the changed key is replaced. The in-memory map is only updated once
    /// the write succeeded, so memory and disk never disagree about what was
    /// stored.
    fn commit(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let current = read_document(&self.path);
        let mut next = current.clone();
        change(&mut next);
        if next != current {
            write_document(&self.path, &next)?;
        }
        *entries = next;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.remove(key);
        })
    }
}

/// Read the storage document, degrading to empty on any problem.
fn read_document(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read client storage, starting empty");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Malformed client storage, starting empty");
        BTreeMap::new()
    })
}

/// Write the storage document atomically.
fn write_document(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let body = serde_json::to_vec_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_profile(dir.path());
        storage.set("breeze.favorites", "{\"version\":1}").unwrap();
        drop(storage);

        let reopened = FileStorage::in_profile(dir.path());
        assert_eq!(
            reopened.get("breeze.favorites").as_deref(),
            Some("{\"version\":1}")
        );
    }

    #[test]
    fn test_delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_profile(dir.path());
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.delete("a").unwrap();

        let reopened = FileStorage::in_profile(dir.path());
        assert!(reopened.get("a").is_none());
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_profile_dir_is_created_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("profiles").join("default");
        let storage = FileStorage::in_profile(&nested);
        assert!(storage.get("a").is_none());

        storage.set("a", "1").unwrap();
        assert!(nested.join(FileStorage::FILE_NAME).exists());
    }

    #[test]
    fn test_handles_on_one_profile_keep_each_others_keys() {
        let dir = tempfile::tempdir().unwrap();
        let first_tab = FileStorage::in_profile(dir.path());
        let second_tab = FileStorage::in_profile(dir.path());

        second_tab.set("breeze.favorites", "fav").unwrap();
        first_tab.set("breeze.cart", "cart").unwrap();
        second_tab.delete("breeze.compare").unwrap();

        let reopened = FileStorage::in_profile(dir.path());
        assert_eq!(reopened.get("breeze.favorites").as_deref(), Some("fav"));
        assert_eq!(reopened.get("breeze.cart").as_deref(), Some("cart"));
    }

    #[test]
    fn test_corrupt_document_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FileStorage::FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path);
        assert!(storage.get("anything").is_none());

        storage.set("a", "1").unwrap();
        assert_eq!(FileStorage::open(&path).get("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the document should be makes the rename fail.
        let path = dir.path().join("blocked.json");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let storage = FileStorage::open(&path);
        assert!(storage.set("a", "1").is_err());
        assert!(storage.get("a").is_none());
    }
}
