//! Storage Adapter contract and the in-memory adapter.
//!
//! Records are keyed by statement text.  Adapters decide their own
//! enumeration order; the order returned by [`StorageAdapter::keys`] is the
//! order in which [`ConversationMemory`][crate::ConversationMemory] scans, and
//! therefore settles scan-order tie-breaks.
//!
//! All shipped adapters enumerate in insertion order, and `update` on a
//! missing key creates the record.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rejoinder_types::{FieldUpdate, Statement, StatementFields};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can arise from a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("statement already exists: {0:?}")]
    DuplicateKey(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// StorageAdapter
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value persistence for statements.
///
/// # Contract
///
/// * `find` – `Ok(None)` for a missing key, never an error.
/// * `insert` – creates a record; an existing key is
///   [`StorageError::DuplicateKey`].
/// * `update` – merges the fields carried by the update into the record,
///   creating it when missing.
/// * `keys` – every stored key, in the adapter's enumeration order.
/// * `get_random` – one existing key, or `None` when empty.
pub trait StorageAdapter: Send {
    fn find(&self, key: &str) -> Result<Option<StatementFields>, StorageError>;

    fn insert(&mut self, key: &str, fields: StatementFields) -> Result<(), StorageError>;

    fn update(&mut self, key: &str, update: FieldUpdate) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn get_random(&self) -> Result<Option<String>, StorageError>;

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InMemoryStorage
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered in-process store.  Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    order: Vec<String>,
    records: HashMap<String, StatementFields>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from statements; a repeated text keeps its first position
    /// and its last fields.
    pub fn from_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut store = Self::new();
        for statement in statements {
            if !store.records.contains_key(&statement.text) {
                store.order.push(statement.text.clone());
            }
            store.records.insert(statement.text, statement.fields);
        }
        store
    }

    /// Every record in enumeration order.
    pub fn statements(&self) -> Vec<Statement> {
        self.order
            .iter()
            .filter_map(|key| {
                self.records
                    .get(key)
                    .map(|fields| Statement::new(key.clone(), fields.clone()))
            })
            .collect()
    }
}

impl StorageAdapter for InMemoryStorage {
    fn find(&self, key: &str) -> Result<Option<StatementFields>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn insert(&mut self, key: &str, fields: StatementFields) -> Result<(), StorageError> {
        if self.records.contains_key(key) {
            return Err(StorageError::DuplicateKey(key.to_string()));
        }
        self.order.push(key.to_string());
        self.records.insert(key.to_string(), fields);
        Ok(())
    }

    fn update(&mut self, key: &str, update: FieldUpdate) -> Result<(), StorageError> {
        if !self.records.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.records.entry(key.to_string()).or_default().apply(update);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.order.clone())
    }

    fn get_random(&self) -> Result<Option<String>, StorageError> {
        Ok(self.order.choose(&mut rand::thread_rng()).cloned())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.order.len())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_missing_key_is_none() {
        let store = InMemoryStorage::new();
        assert!(store.find("nothing").unwrap().is_none());
    }

    #[test]
    fn insert_then_find() {
        let mut store = InMemoryStorage::new();
        store.insert("Hello", StatementFields::default()).unwrap();
        let fields = store.find("Hello").unwrap().unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut store = InMemoryStorage::new();
        store.insert("Hello", StatementFields::default()).unwrap();
        let err = store.insert("Hello", StatementFields::default()).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey(k) if k == "Hello"));
    }

    #[test]
    fn update_merges_fields() {
        let mut store = InMemoryStorage::new();
        store.update("Hi", FieldUpdate::new().occurrence(2)).unwrap();
        store.update("Hi", FieldUpdate::new().name("bob")).unwrap();
        let fields = store.find("Hi").unwrap().unwrap();
        assert_eq!(fields.occurrence, Some(2));
        assert_eq!(fields.name.as_deref(), Some("bob"));
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut store = InMemoryStorage::new();
        for key in ["b", "a", "c"] {
            store.insert(key, StatementFields::default()).unwrap();
        }
        store.update("a", FieldUpdate::new().occurrence(1)).unwrap();
        store.update("d", FieldUpdate::new().occurrence(1)).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b", "a", "c", "d"]);
        assert_eq!(store.len().unwrap(), 4);
    }

    #[test]
    fn get_random_returns_existing_key() {
        let mut store = InMemoryStorage::new();
        assert_eq!(store.get_random().unwrap(), None);
        store.insert("only", StatementFields::default()).unwrap();
        assert_eq!(store.get_random().unwrap().as_deref(), Some("only"));
    }

    #[test]
    fn from_statements_keeps_first_position() {
        let store = InMemoryStorage::from_statements(vec![
            Statement::bare("x"),
            Statement::bare("y"),
            Statement::new("x", StatementFields { occurrence: Some(3), ..Default::default() }),
        ]);
        assert_eq!(store.keys().unwrap(), vec!["x", "y"]);
        assert_eq!(store.find("x").unwrap().unwrap().occurrence, Some(3));
        assert_eq!(store.statements().len(), 2);
    }

    #[test]
    fn is_empty_uses_len() {
        let mut store = InMemoryStorage::new();
        assert!(store.is_empty().unwrap());
        store.insert("x", StatementFields::default()).unwrap();
        assert!(!store.is_empty().unwrap());
    }
}
