//! Bot configuration.
//!
//! Every field has a serde default, so an empty document is a valid
//! configuration: an in-memory store, the Levenshtein comparator, English
//! stopwords and logging of user input enabled.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rejoinder_compare::{ComparatorKind, Language};
use rejoinder_memory::{
    InMemoryStorage, JsonFileStorage, SqliteStorage, StorageAdapter, StorageError, TieBreak,
};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// AdapterKind
// ─────────────────────────────────────────────────────────────────────────────

/// Compile-time registry of storage adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Process-local; nothing survives a restart.
    #[default]
    Memory,
    /// A JSON array of statements at `database`.
    Json,
    /// A SQLite database at `database`.
    Sqlite,
}

impl AdapterKind {
    /// Open the adapter.  `database` is ignored by [`AdapterKind::Memory`].
    pub fn open(self, database: &Path) -> Result<Box<dyn StorageAdapter>, StorageError> {
        Ok(match self {
            AdapterKind::Memory => Box::new(InMemoryStorage::new()),
            AdapterKind::Json => Box::new(JsonFileStorage::open(database)?),
            AdapterKind::Sqlite => Box::new(SqliteStorage::open(database)?),
        })
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::Memory => write!(f, "memory"),
            AdapterKind::Json => write!(f, "json"),
            AdapterKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for AdapterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(AdapterKind::Memory),
            "json" => Ok(AdapterKind::Json),
            "sqlite" => Ok(AdapterKind::Sqlite),
            other => Err(format!("unknown storage adapter '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChatConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Speaker name used when describing the bot.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    #[serde(default)]
    pub adapter: AdapterKind,

    /// Database path for the `json` and `sqlite` adapters.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Whether user input is recorded into storage.
    #[serde(default = "default_logging")]
    pub logging: bool,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub comparator: ComparatorKind,

    #[serde(default)]
    pub tie_break: TieBreak,

    /// JSON taxonomy replacing the built-in one for `synset` and `jaccard`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thesaurus: Option<PathBuf>,
}

fn default_bot_name() -> String {
    "Rejoinder".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("database.db")
}

fn default_logging() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            adapter: AdapterKind::default(),
            database: default_database(),
            logging: default_logging(),
            language: Language::default(),
            comparator: ComparatorKind::default(),
            tie_break: TieBreak::default(),
            thesaurus: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: ChatConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ChatConfig::default());
        assert!(cfg.logging);
        assert_eq!(cfg.adapter, AdapterKind::Memory);
        assert_eq!(cfg.comparator, ComparatorKind::Levenshtein);
        assert_eq!(cfg.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    fn fields_use_lowercase_names() {
        let cfg: ChatConfig = serde_json::from_str(
            r#"{ "adapter": "sqlite", "language": "spanish",
                 "comparator": "jaccard", "tie_break": "last-scanned",
                 "logging": false }"#,
        )
        .unwrap();
        assert_eq!(cfg.adapter, AdapterKind::Sqlite);
        assert_eq!(cfg.language, Language::Spanish);
        assert_eq!(cfg.comparator, ComparatorKind::Jaccard);
        assert_eq!(cfg.tie_break, TieBreak::LastScanned);
        assert!(!cfg.logging);
    }

    #[test]
    fn adapter_kind_parses_and_displays() {
        for kind in [AdapterKind::Memory, AdapterKind::Json, AdapterKind::Sqlite] {
            assert_eq!(kind.to_string().parse::<AdapterKind>().unwrap(), kind);
        }
        assert_eq!("In-Memory".parse::<AdapterKind>().unwrap(), AdapterKind::Memory);
        assert!("mongodb".parse::<AdapterKind>().is_err());
    }

    #[test]
    fn every_adapter_opens() {
        let dir = TempDir::new().unwrap();
        for (kind, file) in [
            (AdapterKind::Memory, "unused"),
            (AdapterKind::Json, "db.json"),
            (AdapterKind::Sqlite, "db.sqlite3"),
        ] {
            let store = kind.open(&dir.path().join(file)).unwrap();
            assert!(store.is_empty().unwrap(), "{kind} should start empty");
        }
    }
}
