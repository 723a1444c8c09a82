//! Conversation Memory.
//!
//! [`ConversationMemory`] wraps a [`StorageAdapter`] and maintains the
//! response graph on top of it:
//!
//! * every statement carries an `occurrence` count, incremented each time it
//!   is trained or recorded;
//! * every statement lists, in `in_response_to`, the statements it followed.
//!
//! Given the statement closest to a user's input, the most frequent reply is
//! the stored statement with the highest occurrence whose `in_response_to`
//! contains it.
//!
//! # Example
//!
//! ```rust
//! use rejoinder_memory::{ConversationMemory, InMemoryStorage, Session};
//!
//! let mut memory = ConversationMemory::new(Box::new(InMemoryStorage::new()));
//! memory.train(["Hello", "Hi there"], &mut Session::new()).unwrap();
//!
//! assert_eq!(memory.get_responses("Hi there").unwrap(), vec!["Hello"]);
//! assert_eq!(memory.get_occurrence_count("Hello").unwrap(), 1);
//! ```

use chrono::Utc;
use rejoinder_types::{FieldUpdate, Statement, StatementFields};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::session::Session;
use crate::storage::{StorageAdapter, StorageError};

// ─────────────────────────────────────────────────────────────────────────────
// TieBreak
// ─────────────────────────────────────────────────────────────────────────────

/// How [`ConversationMemory::get_most_frequent_response`] settles equal counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// A reply displaces the closest statement itself when its count is at
    /// least as high; between replies of equal count the lexicographically
    /// smallest text wins.  Independent of adapter enumeration order.
    #[default]
    Lexicographic,
    /// Any candidate whose count is at least the current best replaces it, so
    /// the last one enumerated wins.
    LastScanned,
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::Lexicographic => write!(f, "lexicographic"),
            TieBreak::LastScanned => write!(f, "last-scanned"),
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexicographic" => Ok(TieBreak::Lexicographic),
            "last-scanned" | "last_scanned" => Ok(TieBreak::LastScanned),
            other => Err(format!("unknown tie-break policy: {other}")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConversationMemory
// ─────────────────────────────────────────────────────────────────────────────

pub struct ConversationMemory {
    storage: Box<dyn StorageAdapter>,
    tie_break: TieBreak,
}

impl ConversationMemory {
    pub fn new(storage: Box<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn storage(&self) -> &dyn StorageAdapter {
        self.storage.as_ref()
    }

    // ── Lookups ──────────────────────────────────────────────────────────────

    /// Stored fields of `key`, empty when it was never stored.
    pub fn find(&self, key: &str) -> Result<StatementFields, StorageError> {
        Ok(self.storage.find(key)?.unwrap_or_default())
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.storage.keys()
    }

    pub fn get_random(&self) -> Result<Option<String>, StorageError> {
        self.storage.get_random()
    }

    /// Every stored statement in enumeration order.
    pub fn statements(&self) -> Result<Vec<Statement>, StorageError> {
        let mut statements = Vec::new();
        for key in self.storage.keys()? {
            if let Some(fields) = self.storage.find(&key)? {
                statements.push(Statement::new(key, fields));
            }
        }
        Ok(statements)
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        self.storage.len()
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.storage.is_empty()
    }

    /// Occurrence count used for ranking; a statement never counted is `1`.
    pub fn get_occurrence_count(&self, key: &str) -> Result<u64, StorageError> {
        Ok(self.find(key)?.occurrence.unwrap_or(1))
    }

    pub fn get_responses(&self, key: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.find(key)?.in_response_to)
    }

    /// All stored statements that were given in reply to `key`.
    pub fn statements_in_response_to(&self, key: &str) -> Result<Vec<Statement>, StorageError> {
        Ok(self
            .statements()?
            .into_iter()
            .filter(|statement| statement.responds_to(key))
            .collect())
    }

    // ── Field computations (caller persists) ─────────────────────────────────

    /// The stored occurrence count (a statement never counted is `0`) plus one.
    pub fn update_occurrence_count(&self, key: &str) -> Result<u64, StorageError> {
        Ok(self.find(key)?.occurrence.unwrap_or(0) + 1)
    }

    /// The stored response list with `previous` appended, unless it is absent,
    /// blank, already listed, or `key` itself.
    pub fn update_response_list(
        &self,
        key: &str,
        previous: Option<&str>,
    ) -> Result<Vec<String>, StorageError> {
        let mut responses = self.find(key)?.in_response_to;
        if let Some(previous) = previous.filter(|p| !p.trim().is_empty())
            && previous != key
            && !responses.iter().any(|r| r == previous)
        {
            responses.push(previous.to_string());
        }
        Ok(responses)
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    /// Store each statement of `conversation` in order, linking it to the one
    /// before.  The first statement links to `session.last()`.  Blank entries
    /// are skipped.
    pub fn train<I, S>(&mut self, conversation: I, session: &mut Session) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in conversation {
            let text = text.as_ref();
            if text.trim().is_empty() {
                warn!(session = %session.id(), "Skipping blank training statement");
                continue;
            }
            let statement = self.upsert(text, session.last(), None)?;
            debug!(
                session = %session.id(),
                text,
                occurrence = statement.fields.occurrence,
                in_response_to = ?statement.fields.in_response_to,
                "Trained statement"
            );
            session.record(text);
        }
        Ok(())
    }

    /// Log one conversational turn spoken by `name`: count it and link it to
    /// the session's last statement.  The session itself is not advanced.
    ///
    /// Blank text is not stored; the returned statement then carries only the
    /// speaker and the current time.
    pub fn record(
        &mut self,
        text: &str,
        name: &str,
        session: &Session,
    ) -> Result<Statement, StorageError> {
        if text.trim().is_empty() {
            warn!(session = %session.id(), name, "Not recording blank statement");
            return Ok(Statement::new(
                text,
                StatementFields {
                    date: Some(Utc::now()),
                    name: Some(name.to_string()),
                    ..Default::default()
                },
            ));
        }
        let statement = self.upsert(text, session.last(), Some(name))?;
        debug!(
            session = %session.id(),
            text,
            name,
            occurrence = statement.fields.occurrence,
            "Recorded statement"
        );
        Ok(statement)
    }

    fn upsert(
        &mut self,
        text: &str,
        previous: Option<&str>,
        name: Option<&str>,
    ) -> Result<Statement, StorageError> {
        let occurrence = self.update_occurrence_count(text)?;
        let responses = self.update_response_list(text, previous)?;

        let mut update = FieldUpdate::new()
            .date(Utc::now())
            .occurrence(occurrence)
            .in_response_to(responses);
        if let Some(name) = name {
            update = update.name(name);
        }
        self.storage.update(text, update)?;

        Ok(Statement::new(text, self.find(text)?))
    }

    // ── Ranking ──────────────────────────────────────────────────────────────

    /// The most frequent stored reply to `closest`.
    ///
    /// Starts from `closest` itself with its ranking count, then scans every
    /// stored statement listing `closest` in its `in_response_to`, keeping the
    /// highest count under the configured [`TieBreak`].  With nothing stored
    /// the session's last statement is returned instead, or `None` when the
    /// session is empty too.
    pub fn get_most_frequent_response(
        &self,
        closest: &str,
        session: &Session,
    ) -> Result<Option<Statement>, StorageError> {
        let keys = self.storage.keys()?;
        if keys.is_empty() {
            return Ok(session.last().map(Statement::bare));
        }

        let mut best = closest.to_string();
        let mut best_count = self.get_occurrence_count(closest)?;
        let mut best_is_reply = false;

        for key in keys {
            let Some(fields) = self.storage.find(&key)? else {
                continue;
            };
            if !fields.in_response_to.iter().any(|r| r == closest) {
                continue;
            }
            let count = fields.occurrence.unwrap_or(1);
            let wins = match self.tie_break {
                TieBreak::LastScanned => count >= best_count,
                TieBreak::Lexicographic => {
                    count > best_count
                        || (count == best_count && (!best_is_reply || key < best))
                }
            };
            if wins {
                best = key;
                best_count = count;
                best_is_reply = true;
            }
        }

        debug!(closest, response = %best, count = best_count, "Selected most frequent response");
        let fields = self.find(&best)?;
        Ok(Some(Statement::new(best, fields)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStorage;
    use crate::storage::InMemoryStorage;

    fn memory() -> ConversationMemory {
        ConversationMemory::new(Box::new(InMemoryStorage::new()))
    }

    fn seeded(tie_break: TieBreak, rows: &[(&str, u64, &[&str])]) -> ConversationMemory {
        let mut storage = InMemoryStorage::new();
        for (text, occurrence, responses) in rows {
            storage
                .insert(
                    text,
                    StatementFields {
                        occurrence: Some(*occurrence),
                        in_response_to: responses.iter().map(|s| s.to_string()).collect(),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        ConversationMemory::new(Box::new(storage)).with_tie_break(tie_break)
    }

    fn most_frequent(memory: &ConversationMemory, closest: &str) -> String {
        memory
            .get_most_frequent_response(closest, &Session::new())
            .unwrap()
            .unwrap()
            .text
    }

    // ── Lookups ──────────────────────────────────────────────────────────────

    #[test]
    fn find_missing_key_is_empty() {
        assert!(memory().find("nothing").unwrap().is_empty());
    }

    #[test]
    fn occurrence_defaults_differ_between_read_and_write() {
        let memory = memory();
        assert_eq!(memory.get_occurrence_count("ghost").unwrap(), 1);
        assert_eq!(memory.update_occurrence_count("ghost").unwrap(), 1);
    }

    #[test]
    fn update_occurrence_count_does_not_persist() {
        let mut memory = memory();
        memory.train(["Hello"], &mut Session::new()).unwrap();
        assert_eq!(memory.update_occurrence_count("Hello").unwrap(), 2);
        assert_eq!(memory.get_occurrence_count("Hello").unwrap(), 1);
    }

    // ── update_response_list ─────────────────────────────────────────────────

    #[test]
    fn response_list_appends_new_previous() {
        let mut memory = memory();
        memory.train(["Hello", "Hi"], &mut Session::new()).unwrap();
        assert_eq!(
            memory.update_response_list("Hi", Some("Hey")).unwrap(),
            vec!["Hello", "Hey"]
        );
    }

    #[test]
    fn response_list_skips_duplicates_self_and_none() {
        let mut memory = memory();
        memory.train(["Hello", "Hi"], &mut Session::new()).unwrap();
        assert_eq!(memory.update_response_list("Hi", Some("Hello")).unwrap(), vec!["Hello"]);
        assert_eq!(memory.update_response_list("Hi", Some("Hi")).unwrap(), vec!["Hello"]);
        assert_eq!(memory.update_response_list("Hi", None).unwrap(), vec!["Hello"]);
    }

    #[test]
    fn response_list_never_links_blank_previous() {
        let mut memory = memory();
        memory.train(["Hello", "Hi"], &mut Session::new()).unwrap();
        assert_eq!(memory.update_response_list("Hi", Some("")).unwrap(), vec!["Hello"]);
        assert_eq!(memory.update_response_list("Hi", Some("   ")).unwrap(), vec!["Hello"]);
    }

    // ── train ────────────────────────────────────────────────────────────────

    #[test]
    fn two_conversations_sharing_an_opening() {
        let mut memory = memory();
        memory.train(["Hello", "Hi there"], &mut Session::new()).unwrap();
        memory.train(["Hello", "Hey"], &mut Session::new()).unwrap();

        let hello = memory.find("Hello").unwrap();
        assert!(hello.in_response_to.is_empty());
        assert_eq!(hello.occurrence, Some(2));

        for reply in ["Hi there", "Hey"] {
            let fields = memory.find(reply).unwrap();
            assert_eq!(fields.in_response_to, vec!["Hello"]);
            assert_eq!(fields.occurrence, Some(1));
            assert!(fields.date.is_some());
        }
    }

    #[test]
    fn training_twice_adds_two_and_no_duplicate_links() {
        let mut memory = memory();
        let conversation = ["How are you?", "Fine, thanks.", "Glad to hear it."];
        memory.train(conversation, &mut Session::new()).unwrap();
        let before: Vec<u64> = conversation
            .iter()
            .map(|s| memory.get_occurrence_count(s).unwrap())
            .collect();

        memory.train(conversation, &mut Session::new()).unwrap();
        memory.train(conversation, &mut Session::new()).unwrap();
        for (text, count) in conversation.iter().zip(before) {
            assert_eq!(memory.get_occurrence_count(text).unwrap(), count + 2);
        }
        assert_eq!(memory.get_responses("Fine, thanks.").unwrap(), vec!["How are you?"]);
    }

    #[test]
    fn first_entry_links_to_session_last() {
        let mut memory = memory();
        let mut session = Session::new();
        session.record("Good morning");
        memory.train(["Morning!"], &mut session).unwrap();
        assert_eq!(memory.get_responses("Morning!").unwrap(), vec!["Good morning"]);
        assert_eq!(session.last(), Some("Morning!"));
    }

    #[test]
    fn repeated_statement_does_not_link_to_itself() {
        let mut memory = memory();
        memory.train(["Ha", "Ha"], &mut Session::new()).unwrap();
        let ha = memory.find("Ha").unwrap();
        assert!(ha.in_response_to.is_empty());
        assert_eq!(ha.occurrence, Some(2));
    }

    #[test]
    fn blank_entries_are_skipped() {
        let mut memory = memory();
        memory.train(["Hello", "  ", "Hi"], &mut Session::new()).unwrap();
        assert_eq!(memory.keys().unwrap(), vec!["Hello", "Hi"]);
        assert_eq!(memory.get_responses("Hi").unwrap(), vec!["Hello"]);
    }

    // ── record ───────────────────────────────────────────────────────────────

    #[test]
    fn record_sets_name_and_links_previous() {
        let mut memory = memory();
        let mut session = Session::new();
        memory.train(["Hello", "Hi there"], &mut session).unwrap();

        let recorded = memory.record("How are you?", "alice", &session).unwrap();
        assert_eq!(recorded.fields.name.as_deref(), Some("alice"));
        assert_eq!(recorded.fields.occurrence, Some(1));
        assert_eq!(recorded.fields.in_response_to, vec!["Hi there"]);
        assert_eq!(session.last(), Some("Hi there"));
    }

    #[test]
    fn record_skips_blank_text() {
        let mut memory = memory();
        let mut session = Session::new();
        memory.train(["Hello"], &mut session).unwrap();

        let recorded = memory.record("  ", "alice", &session).unwrap();
        assert_eq!(recorded.fields.name.as_deref(), Some("alice"));
        assert!(recorded.fields.date.is_some());
        assert_eq!(recorded.fields.occurrence, None);
        assert_eq!(memory.keys().unwrap(), vec!["Hello"]);
    }

    #[test]
    fn empty_session_statement_is_not_a_link() {
        let mut memory = memory();
        let mut session = Session::new();
        session.record("");
        let recorded = memory.record("Hello", "alice", &session).unwrap();
        assert!(recorded.fields.in_response_to.is_empty());
        assert_eq!(memory.keys().unwrap(), vec!["Hello"]);
    }

    // ── get_most_frequent_response ───────────────────────────────────────────

    #[test]
    fn highest_count_reply_wins() {
        let memory = seeded(
            TieBreak::Lexicographic,
            &[("Hi there", 1, &["Hello"]), ("Hey", 5, &["Hello"])],
        );
        assert_eq!(most_frequent(&memory, "Hello"), "Hey");
    }

    #[test]
    fn lexicographic_tie_prefers_smallest_text() {
        let memory = seeded(
            TieBreak::Lexicographic,
            &[("Hi there", 2, &["Hello"]), ("Hey", 2, &["Hello"])],
        );
        assert_eq!(most_frequent(&memory, "Hello"), "Hey");
    }

    #[test]
    fn last_scanned_tie_prefers_last_enumerated() {
        let memory = seeded(
            TieBreak::LastScanned,
            &[("Hey", 2, &["Hello"]), ("Hi there", 2, &["Hello"])],
        );
        assert_eq!(most_frequent(&memory, "Hello"), "Hi there");
    }

    #[test]
    fn equal_reply_displaces_closest_under_both_policies() {
        for tie_break in [TieBreak::Lexicographic, TieBreak::LastScanned] {
            let memory = seeded(tie_break, &[("Hello", 3, &[]), ("Hi", 3, &["Hello"])]);
            assert_eq!(most_frequent(&memory, "Hello"), "Hi");
        }
    }

    #[test]
    fn less_frequent_replies_leave_closest_in_place() {
        let memory = seeded(
            TieBreak::Lexicographic,
            &[("Hello", 4, &[]), ("Hi", 1, &["Hello"])],
        );
        assert_eq!(most_frequent(&memory, "Hello"), "Hello");
    }

    #[test]
    fn no_reply_returns_closest_with_its_fields() {
        let memory = seeded(TieBreak::Lexicographic, &[("Hello", 2, &[])]);
        let statement = memory
            .get_most_frequent_response("Hello", &Session::new())
            .unwrap()
            .unwrap();
        assert_eq!(statement.text, "Hello");
        assert_eq!(statement.fields.occurrence, Some(2));
    }

    #[test]
    fn empty_storage_falls_back_to_session() {
        let memory = memory();
        assert!(
            memory
                .get_most_frequent_response("Hello", &Session::new())
                .unwrap()
                .is_none()
        );

        let mut session = Session::new();
        session.record("Earlier");
        let statement = memory
            .get_most_frequent_response("Hello", &session)
            .unwrap()
            .unwrap();
        assert_eq!(statement, Statement::bare("Earlier"));
    }

    #[test]
    fn statements_in_response_to_lists_replies_in_order() {
        let mut memory = memory();
        memory.train(["Hello", "Hi there"], &mut Session::new()).unwrap();
        memory.train(["Hello", "Hey"], &mut Session::new()).unwrap();
        let replies: Vec<String> = memory
            .statements_in_response_to("Hello")
            .unwrap()
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(replies, vec!["Hi there", "Hey"]);
        assert_eq!(memory.len().unwrap(), 3);
    }

    #[test]
    fn sqlite_backend_behaves_the_same() {
        let mut memory = ConversationMemory::new(Box::new(SqliteStorage::open_in_memory().unwrap()));
        memory.train(["Hello", "Hi there"], &mut Session::new()).unwrap();
        memory.train(["Hello", "Hey"], &mut Session::new()).unwrap();
        memory.train(["Hello", "Hey"], &mut Session::new()).unwrap();
        assert_eq!(memory.get_occurrence_count("Hello").unwrap(), 3);
        assert_eq!(most_frequent(&memory, "Hello"), "Hey");
    }

    // ── TieBreak parsing ─────────────────────────────────────────────────────

    #[test]
    fn tie_break_round_trips_through_text() {
        for policy in [TieBreak::Lexicographic, TieBreak::LastScanned] {
            assert_eq!(policy.to_string().parse::<TieBreak>().unwrap(), policy);
        }
        assert!("random".parse::<TieBreak>().is_err());
    }
}
