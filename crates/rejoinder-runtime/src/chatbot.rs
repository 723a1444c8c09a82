//! [`ChatBot`] – the Response Orchestrator.
//!
//! Each call to [`ChatBot::get_response`]:
//!
//! 1. **Match** – scores every stored statement against the input with the
//!    configured [`Comparator`] and keeps the closest one.  Empty input skips
//!    scoring and picks a random stored statement instead.
//! 2. **Select** – asks [`ConversationMemory`] for the most frequent reply to
//!    the closest statement.  When there is none, the closest statement is the
//!    reply.
//! 3. **Record** – when logging is enabled, stores the input as a turn spoken
//!    by the user, linked to the previous statement of the session.
//! 4. **Advance** – pushes a non-empty reply onto the session so the next
//!    input is linked to it.

use chrono::Utc;
use rejoinder_compare::{Comparator, CompareError, Taxonomy};
use rejoinder_memory::{ConversationMemory, Session, StorageError};
use rejoinder_types::{Statement, StatementFields};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ChatConfig;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to load thesaurus: {0}")]
    Thesaurus(#[from] CompareError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Exchange
// ─────────────────────────────────────────────────────────────────────────────

/// One input/reply pair as produced by [`ChatBot::get_response_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    /// The user's statement, with speaker name and timestamp.  When logging
    /// is on, its fields are the stored ones after recording.
    pub input: Statement,
    /// The bot's reply with its stored fields.
    pub response: Statement,
}

// ─────────────────────────────────────────────────────────────────────────────
// ChatBot
// ─────────────────────────────────────────────────────────────────────────────

pub struct ChatBot {
    name: String,
    memory: ConversationMemory,
    comparator: Box<dyn Comparator>,
    logging: bool,
    session: Session,
}

impl ChatBot {
    pub fn new(
        name: impl Into<String>,
        memory: ConversationMemory,
        comparator: Box<dyn Comparator>,
        logging: bool,
    ) -> Self {
        Self {
            name: name.into(),
            memory,
            comparator,
            logging,
            session: Session::new(),
        }
    }

    /// Open the configured storage adapter and build the configured
    /// comparator.
    ///
    /// # Errors
    ///
    /// [`ChatError::Storage`] when the database cannot be opened and
    /// [`ChatError::Thesaurus`] when a configured taxonomy file cannot be
    /// read.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let storage = config.adapter.open(&config.database)?;
        info!(
            adapter = %config.adapter,
            database = %config.database.display(),
            statements = storage.len()?,
            "Opened statement storage"
        );
        let memory = ConversationMemory::new(storage).with_tie_break(config.tie_break);

        let comparator = match &config.thesaurus {
            Some(path) => {
                let taxonomy = Taxonomy::from_json_file(path)?;
                info!(path = %path.display(), senses = taxonomy.len(), "Loaded thesaurus");
                config.comparator.build_with_taxonomy(config.language, taxonomy)
            }
            None => config.comparator.build(config.language),
        };

        Ok(Self::new(
            config.bot_name.clone(),
            memory,
            comparator,
            config.logging,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn comparator(&self) -> &dyn Comparator {
        self.comparator.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The statement the next input will be linked to.
    pub fn last_statement(&self) -> Option<&str> {
        self.session.last()
    }

    /// Train on one conversation.  The conversation starts fresh, so its
    /// first statement is not linked to anything said before; afterwards the
    /// session continues from its last statement.
    pub fn train<I, S>(&mut self, conversation: I) -> Result<(), ChatError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = Session::new();
        self.memory.train(conversation, &mut batch)?;
        if let Some(last) = batch.last() {
            self.session.record(last);
        }
        debug!(statements = batch.len(), "Trained conversation");
        Ok(())
    }

    pub fn get_response(&mut self, input: &str, user_name: &str) -> Result<String, ChatError> {
        Ok(self.get_response_data(input, user_name)?.response.text)
    }

    pub fn get_response_data(
        &mut self,
        input: &str,
        user_name: &str,
    ) -> Result<Exchange, ChatError> {
        let closest = if input.is_empty() {
            self.memory.get_random()?.unwrap_or_default()
        } else {
            self.closest_statement(input)?
        };

        let response = self
            .memory
            .get_most_frequent_response(&closest, &self.session)?
            .unwrap_or_else(|| Statement::bare(closest.as_str()));

        let input = if self.logging {
            self.memory.record(input, user_name, &self.session)?
        } else {
            Statement::new(
                input,
                StatementFields {
                    date: Some(Utc::now()),
                    name: Some(user_name.to_string()),
                    ..Default::default()
                },
            )
        };

        if !response.text.is_empty() {
            self.session.record(response.text.as_str());
        }
        debug!(
            session = %self.session.id(),
            input = %input.text,
            closest = %closest,
            response = %response.text,
            "Responded"
        );
        Ok(Exchange { input, response })
    }

    /// The stored statement scoring highest against `input`; the first one
    /// enumerated wins a tie.  With nothing stored, `input` itself.
    fn closest_statement(&self, input: &str) -> Result<String, ChatError> {
        let mut best: Option<(String, f64)> = None;
        for key in self.memory.keys()? {
            let score = self.comparator.compare(input, &key);
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((key, score));
            }
        }
        if let Some((key, score)) = &best {
            debug!(comparator = self.comparator.name(), closest = %key, score, "Matched input");
        }
        Ok(best.map_or_else(|| input.to_string(), |(key, _)| key))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
