//! Key/value persistence for records and settings
//!
//! Features:
//! - One flat JSON string per key
//! - LocalStorage on web, one file per key on native
//! - In-memory backend for tests and headless runs
//! - Atomic-ish file writes (tmp → rename)

use std::collections::HashMap;

use thiserror::Error;

/// Failure talking to a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string store, shaped after the browser `Storage` API
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{Storage, StorageError};

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        /// Use `dir`, creating it if needed
        pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
            let dir = dir.as_ref().to_path_buf();
            fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        fn path_for(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
                .collect();
            self.dir.join(format!("{name}.json"))
        }
    }

    impl Storage for FileStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path_for(key)) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            log::debug!("Wrote {} ({} bytes)", path.display(), value.len());
            Ok(())
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            match fs::remove_file(self.path_for(key)) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{Storage, StorageError};

    fn js_error(e: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Unavailable(format!("{e:?}"))
    }

    /// The browser's `window.localStorage`
    pub struct LocalStorage {
        inner: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, StorageError> {
            let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
            let inner = window
                .local_storage()
                .map_err(js_error)?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
            Ok(Self { inner })
        }
    }

    impl Storage for LocalStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key).map_err(js_error)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value).map_err(js_error)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key).map_err(js_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(target_arch = "wasm32"))]
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a").unwrap(), None);
        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
        storage.remove_item("a").unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(dir.path().join("saves")).unwrap();
        assert_eq!(storage.get_item("records").unwrap(), None);
        storage.set_item("records", "{\"highScore\":5}").unwrap();
        assert_eq!(
            storage.get_item("records").unwrap().as_deref(),
            Some("{\"highScore\":5}")
        );
        storage.remove_item("records").unwrap();
        storage.remove_item("records").unwrap();
        assert_eq!(storage.get_item("records").unwrap(), None);
    }
}
