//! Persistence backends for the remembered session.
//!
//! A backend holds at most one serialized record. The session store decides
//! what goes in it and when; backends only read, write and remove text.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Errors that can occur when touching persisted session state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("session storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Somewhere a single session record can live between runs.
pub trait SessionStorage {
    /// Read the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record exists but cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    fn save(&self, record: &str) -> Result<(), StorageError>;

    /// Delete the stored record. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing record cannot be removed.
    fn remove(&self) -> Result<(), StorageError>;
}

/// Stores the record as a file, creating parent directories on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, record).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Keeps the record in memory. Clones share the same slot, so a test can
/// hold one handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `record`.
    #[must_use]
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record.into()))),
        }
    }

    /// Current record, for inspection.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/dir/session.json"));

        assert_eq!(storage.load().unwrap(), None);
        storage.save("{\"token\":\"t\"}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"token\":\"t\"}"));

        storage.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // Second remove is a no-op.
        storage.remove().unwrap();
    }

    #[test]
    fn test_file_storage_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.load(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_memory_storage_shares_slot() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.save("record").unwrap();
        assert_eq!(handle.snapshot().as_deref(), Some("record"));
        handle.remove().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
