//! `rejoinder-memory` – The Response Graph.
//!
//! Remembers every statement the bot has seen, how often it occurred, and
//! which statements it was given in reply to.
//!
//! # Modules
//!
//! - [`storage`] – the [`StorageAdapter`][storage::StorageAdapter] contract
//!   and [`InMemoryStorage`][storage::InMemoryStorage].
//! - [`json_file`] – [`JsonFileStorage`][json_file::JsonFileStorage]: the
//!   in-memory store mirrored to a JSON file after every write.
//! - [`sqlite`] – [`SqliteStorage`][sqlite::SqliteStorage]: statements in a
//!   local SQLite table.
//! - [`session`] – [`Session`][session::Session]: the trailing list of
//!   recorded statements used as "previous statement" context.
//! - [`conversation`] – [`ConversationMemory`][conversation::ConversationMemory]:
//!   training, occurrence counting and most-frequent-response selection.

pub mod conversation;
pub mod json_file;
pub mod session;
pub mod sqlite;
pub mod storage;

pub use conversation::{ConversationMemory, TieBreak};
pub use json_file::JsonFileStorage;
pub use session::Session;
pub use sqlite::SqliteStorage;
pub use storage::{InMemoryStorage, StorageAdapter, StorageError};
