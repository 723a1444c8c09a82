//! Training corpus files.
//!
//! A corpus is JSON, either a bare array of conversations or an object with a
//! `conversations` key:
//!
//! ```json
//! [["Hello", "Hi there"], ["How are you?", "Fine, thanks."]]
//! {"conversations": [["Hello", "Hi there"]]}
//! ```

use std::fs;
use std::path::Path;

use rejoinder_types::Conversation;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Bare(Vec<Conversation>),
    Wrapped { conversations: Vec<Conversation> },
}

/// Parse a corpus document.  Empty conversations are dropped.
pub fn parse_corpus(json: &str) -> Result<Vec<Conversation>, String> {
    let file: CorpusFile = serde_json::from_str(json).map_err(|e| {
        format!("Expected an array of conversations or {{\"conversations\": [...]}}: {e}")
    })?;
    let conversations = match file {
        CorpusFile::Bare(conversations) => conversations,
        CorpusFile::Wrapped { conversations } => conversations,
    };
    Ok(conversations.into_iter().filter(|c| !c.is_empty()).collect())
}

/// Read and parse the corpus file at `path`.
pub fn load_corpus(path: &Path) -> Result<Vec<Conversation>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read corpus at {}: {}", path.display(), e))?;
    parse_corpus(&raw)
}
