//! Conversation sessions.
//!
//! A [`Session`] remembers the last text recorded and how many were recorded
//! in total.  The last text is the "previous statement" that the next
//! recorded statement is linked to.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    last: Option<String>,
    count: usize,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            last: None,
            count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The most recently recorded statement, if any.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn record(&mut self, text: impl Into<String>) {
        self.last = Some(text.into());
        self.count += 1;
    }

    /// Number of statements recorded over the session's lifetime.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_previous_statement() {
        let session = Session::new();
        assert!(session.last().is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn last_tracks_latest_record() {
        let mut session = Session::new();
        session.record("Hello");
        session.record("Hi there");
        assert_eq!(session.last(), Some("Hi there"));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn only_the_latest_text_is_kept() {
        let mut session = Session::new();
        for n in 0..1_000 {
            session.record(format!("turn {n}"));
        }
        assert_eq!(session.last(), Some("turn 999"));
        assert_eq!(session.len(), 1_000);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
