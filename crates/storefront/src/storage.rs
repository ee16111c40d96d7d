//! Origin-scoped key-value storage for the persisted cart.
//!
//! [`KeyValueStorage`] mirrors the browser `localStorage` contract: string
//! keys, string values, one namespace per origin. [`MemoryStorage`] keeps
//! everything in process; [`FileStorage`] keeps one JSON map per origin on
//! disk so a cart survives restarts.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Storage keys.
pub mod keys {
    /// Key holding the serialized cart.
    pub const CART: &str = "fh_cart_v2";
}

/// File holding the key-value map inside an origin directory.
const STORAGE_FILE: &str = "local_storage.json";

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage file is not a valid key-value map: {0}")]
    Format(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string key-value store scoped to one origin.
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never set or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// On-disk storage: `<root>/<origin-slug>/local_storage.json`.
///
/// Every call reads the file afresh, so several handles on the same origin
/// observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage for `origin` under `root`. Directories are created on first
    /// write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, origin: &str) -> Self {
        Self {
            path: root.as_ref().join(origin_slug(origin)).join(STORAGE_FILE),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        // Write then rename so a crash never leaves a half-written map
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), keys = map.len(), "Storage file written");
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // A damaged map file is replaced rather than blocking writes
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_owned(), value.to_owned());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map().unwrap_or_default();
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}

/// Filesystem-safe directory name for an origin.
///
/// `http://localhost:8080` becomes `http_localhost_8080`.
#[must_use]
pub fn origin_slug(origin: &str) -> String {
    let mut slug = String::with_capacity(origin.len());
    let mut last_was_sep = false;
    for ch in origin.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
            slug.push(ch);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    let slug = slug.trim_matches('_').to_owned();
    if slug.is_empty() {
        "default".to_owned()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::CART).expect("get"), None);

        storage.set(keys::CART, "[]").expect("set");
        assert_eq!(storage.get(keys::CART).expect("get").as_deref(), Some("[]"));

        storage.remove(keys::CART).expect("remove");
        assert_eq!(storage.get(keys::CART).expect("get"), None);
        storage.remove(keys::CART).expect("removing twice is fine");
    }

    #[test]
    fn test_file_storage_persists_across_handles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = FileStorage::new(dir.path(), "http://localhost:8080");
        first.set(keys::CART, r#"[{"id":"a"}]"#).expect("set");

        let second = FileStorage::new(dir.path(), "http://localhost:8080");
        assert_eq!(
            second.get(keys::CART).expect("get").as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
        assert!(second.path().ends_with("http_localhost_8080/local_storage.json"));
    }

    #[test]
    fn test_file_storage_is_origin_scoped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let shop = FileStorage::new(dir.path(), "https://shop.example");
        let other = FileStorage::new(dir.path(), "https://other.example");

        shop.set(keys::CART, "[]").expect("set");
        assert_eq!(other.get(keys::CART).expect("get"), None);
    }

    #[test]
    fn test_file_storage_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path(), "http://localhost");
        assert_eq!(storage.get(keys::CART).expect("get"), None);
        storage.remove(keys::CART).expect("remove on missing file");
    }

    #[test]
    fn test_file_storage_recovers_from_damaged_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path(), "http://localhost");
        fs::create_dir_all(storage.path().parent().expect("parent")).expect("mkdir");
        fs::write(storage.path(), "garbage").expect("write");

        assert!(matches!(
            storage.get(keys::CART),
            Err(StorageError::Format(_))
        ));
        storage.set(keys::CART, "[]").expect("set replaces damaged map");
        assert_eq!(storage.get(keys::CART).expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn test_origin_slug() {
        assert_eq!(origin_slug("http://localhost:8080"), "http_localhost_8080");
        assert_eq!(origin_slug("https://Shop.Example"), "https_shop.example");
        assert_eq!(origin_slug("///"), "default");
    }
}
