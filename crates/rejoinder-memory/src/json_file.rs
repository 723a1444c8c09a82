//! JSON-file Storage Adapter.
//!
//! Keeps an [`InMemoryStorage`] and rewrites the whole file as a pretty
//! JSON array of statements after each successful write.  A missing file is
//! an empty store; it is created on the first write.
//!
//! The file is replaced through a sibling `.tmp` file and a rename, so a
//! crash mid-write leaves the previous contents in place.  When the write
//! fails the in-memory change is rolled back and the error returned.

use std::fs;
use std::path::{Path, PathBuf};

use rejoinder_types::{FieldUpdate, Statement, StatementFields};
use tracing::{debug, warn};

use crate::storage::{InMemoryStorage, StorageAdapter, StorageError};

pub struct JsonFileStorage {
    path: PathBuf,
    inner: InMemoryStorage,
}

impl JsonFileStorage {
    /// Load the store at `path`, or start empty when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let statements: Vec<Statement> = if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)?
            };
            debug!(path = %path.display(), count = statements.len(), "Loaded statement file");
            InMemoryStorage::from_statements(statements)
        } else {
            InMemoryStorage::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner.statements())?;

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);
        fs::write(&temp_path, json)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Apply `change` to the in-memory store and persist it, restoring the
    /// previous state when either step fails.
    fn write_through(
        &mut self,
        change: impl FnOnce(&mut InMemoryStorage) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let snapshot = self.inner.clone();
        change(&mut self.inner)?;
        if let Err(e) = self.flush() {
            warn!(path = %self.path.display(), error = %e, "Statement file write failed; change rolled back");
            self.inner = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

impl StorageAdapter for JsonFileStorage {
    fn find(&self, key: &str) -> Result<Option<StatementFields>, StorageError> {
        self.inner.find(key)
    }

    fn insert(&mut self, key: &str, fields: StatementFields) -> Result<(), StorageError> {
        self.write_through(|inner| inner.insert(key, fields))
    }

    fn update(&mut self, key: &str, update: FieldUpdate) -> Result<(), StorageError> {
        self.write_through(|inner| inner.update(key, update))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }

    fn get_random(&self) -> Result<Option<String>, StorageError> {
        self.inner.get_random()
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.inner.len()
    }
}
