//! SQLite Storage Adapter.
//!
//! Persists statements to a local SQLite database so the response graph
//! survives restarts.
//!
//! # Storage layout
//!
//! A single table `statements` is created (if it does not already exist)
//! with the following columns:
//!
//! | column         | type    | description                                  |
//! |----------------|---------|----------------------------------------------|
//! | id             | INTEGER | Row id; fixes enumeration order              |
//! | text           | TEXT    | Statement text, unique                       |
//! | occurrence     | INTEGER | Occurrence count, `NULL` until first counted |
//! | in_response_to | TEXT    | JSON array of previous statement texts       |
//! | date           | TEXT    | RFC-3339 time of the last write (UTC)        |
//! | name           | TEXT    | Speaker of the last recorded turn            |
//!
//! # Example
//!
//! ```rust
//! use rejoinder_memory::{SqliteStorage, StorageAdapter};
//! use rejoinder_types::FieldUpdate;
//!
//! let mut store = SqliteStorage::open_in_memory().unwrap();
//! store.update("Hello", FieldUpdate::new().occurrence(1)).unwrap();
//!
//! assert_eq!(store.keys().unwrap(), vec!["Hello"]);
//! assert_eq!(store.find("Hello").unwrap().unwrap().occurrence, Some(1));
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use rejoinder_types::{FieldUpdate, Statement, StatementFields};
use rusqlite::{Connection, OptionalExtension, params};

use crate::storage::{StorageAdapter, StorageError};

/// Raw column values of one row, before JSON and date decoding.
type RawRow = (Option<i64>, String, Option<String>, Option<String>);

/// SQLite-backed statement store.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) a persistent SQLite database at `path`, creating its
    /// parent directory when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a temporary in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS statements (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                text           TEXT NOT NULL UNIQUE,
                occurrence     INTEGER,
                in_response_to TEXT NOT NULL DEFAULT '[]',
                date           TEXT,
                name           TEXT
            );",
        )?;
        Ok(())
    }

    /// Every stored statement, oldest row first.
    pub fn all_statements(&self) -> Result<Vec<Statement>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT text, occurrence, in_response_to, date, name
             FROM statements
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let text: String = row.get(0)?;
            let raw: RawRow = (row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?);
            Ok((text, raw))
        })?;

        let mut statements = Vec::new();
        for row in rows {
            let (text, raw) = row?;
            statements.push(Statement::new(text, decode(raw)?));
        }
        Ok(statements)
    }

    fn write(&self, key: &str, fields: &StatementFields) -> Result<(), StorageError> {
        let in_response_to = serde_json::to_string(&fields.in_response_to)?;
        self.conn.execute(
            "UPDATE statements
             SET occurrence = ?2, in_response_to = ?3, date = ?4, name = ?5
             WHERE text = ?1",
            params![
                key,
                fields.occurrence.map(|n| n as i64),
                in_response_to,
                fields.date.map(|d| d.to_rfc3339()),
                fields.name,
            ],
        )?;
        Ok(())
    }
}

fn decode((occurrence, in_response_to, date, name): RawRow) -> Result<StatementFields, StorageError> {
    let date = date
        .map(|s| s.parse::<DateTime<Utc>>())
        .transpose()
        .map_err(|e| {
            rusqlite::Error::InvalidColumnType(3, e.to_string(), rusqlite::types::Type::Text)
        })?;
    Ok(StatementFields {
        occurrence: occurrence.map(|n| n.max(0) as u64),
        in_response_to: serde_json::from_str(&in_response_to)?,
        date,
        name,
    })
}

impl StorageAdapter for SqliteStorage {
    fn find(&self, key: &str) -> Result<Option<StatementFields>, StorageError> {
        let raw: Option<RawRow> = self
            .conn
            .query_row(
                "SELECT occurrence, in_response_to, date, name
                 FROM statements WHERE text = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        raw.map(decode).transpose()
    }

    fn insert(&mut self, key: &str, fields: StatementFields) -> Result<(), StorageError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO statements (text) VALUES (?1)",
            params![key],
        )?;
        if inserted == 0 {
            return Err(StorageError::DuplicateKey(key.to_string()));
        }
        self.write(key, &fields)
    }

    fn update(&mut self, key: &str, update: FieldUpdate) -> Result<(), StorageError> {
        let mut fields = match self.find(key)? {
            Some(fields) => fields,
            None => {
                self.conn
                    .execute("INSERT INTO statements (text) VALUES (?1)", params![key])?;
                StatementFields::default()
            }
        };
        fields.apply(update);
        self.write(key, &fields)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM statements ORDER BY id ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn get_random(&self) -> Result<Option<String>, StorageError> {
        let key = self
            .conn
            .query_row(
                "SELECT text FROM statements ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key)
    }

    fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM statements", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
