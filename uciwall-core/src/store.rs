//! Storage for the configuration text
//!
//! The codec never touches I/O. A [`ConfigStore`] hands it the whole text
//! and takes the whole rewritten text back; there is no partial write and
//! no locking, so concurrent writers race and the last one wins.

use crate::error::StoreError;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Whole-text read/write access to a configuration
pub trait ConfigStore {
    /// Read the full configuration text
    fn read(&self) -> Result<String, StoreError>;

    /// Replace the full configuration text
    fn write(&self, content: &str) -> Result<(), StoreError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Configuration stored in a local (or locally mounted) file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn read(&self) -> Result<String, StoreError> {
        std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, content: &str) -> Result<(), StoreError> {
        let mut text = String::with_capacity(content.len() + 1);
        text.push_str(content);
        if !text.is_empty() {
            text.push('\n');
        }

        std::fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory configuration, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RefCell<String>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(content.into()),
            writes: Cell::new(0),
        }
    }

    /// Current text
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// Number of writes so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self) -> Result<String, StoreError> {
        Ok(self.content())
    }

    fn write(&self, content: &str) -> Result<(), StoreError> {
        *self.content.borrow_mut() = content.to_string();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn read(&self) -> Result<String, StoreError> {
        (**self).read()
    }

    fn write(&self, content: &str) -> Result<(), StoreError> {
        (**self).write(content)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("passwall"));

        store.write("config global").unwrap();
        assert_eq!(store.read().unwrap(), "config global\n");
    }

    #[test]
    fn test_file_store_empty_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("passwall"));

        store.write("").unwrap();
        assert_eq!(store.read().unwrap(), "");
    }

    #[test]
    fn test_file_store_read_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let store = FileStore::new(&path);

        match store.read() {
            Err(StoreError::Read { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_file_store_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("no-such-dir").join("passwall"));
        assert!(matches!(store.write("x"), Err(StoreError::Write { .. })));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new("config a");
        assert_eq!(store.read().unwrap(), "config a");
        store.write("config b").unwrap();
        assert_eq!(store.content(), "config b");
        assert_eq!(store.writes(), 1);
    }
}
