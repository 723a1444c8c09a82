use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ordered sequence of statement texts making up one training exchange.
pub type Conversation = Vec<String>;

/// The stored fields of a statement, keyed elsewhere by the statement text.
///
/// A freshly inserted record has every field empty.  `occurrence` stays
/// `None` until the first increment, which lets read paths and write paths
/// apply different defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementFields {
    /// Number of times this exact text has been trained or seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<u64>,
    /// Statements this one has been issued as a reply to, in insertion order.
    #[serde(default)]
    pub in_response_to: Vec<String>,
    /// Time of the most recent write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Name of the speaker that last issued this statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StatementFields {
    /// `true` when no field has been set yet.
    pub fn is_empty(&self) -> bool {
        self.occurrence.is_none()
            && self.in_response_to.is_empty()
            && self.date.is_none()
            && self.name.is_none()
    }

    /// Merge `update` into these fields, overwriting only the fields it carries.
    pub fn apply(&mut self, update: FieldUpdate) {
        if let Some(occurrence) = update.occurrence {
            self.occurrence = Some(occurrence);
        }
        if let Some(in_response_to) = update.in_response_to {
            self.in_response_to = in_response_to;
        }
        if let Some(date) = update.date {
            self.date = Some(date);
        }
        if let Some(name) = update.name {
            self.name = Some(name);
        }
    }
}

/// A partial set of fields for a merge-style update.
///
/// `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub occurrence: Option<u64>,
    pub in_response_to: Option<Vec<String>>,
    pub date: Option<DateTime<Utc>>,
    pub name: Option<String>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occurrence(mut self, count: u64) -> Self {
        self.occurrence = Some(count);
        self
    }

    pub fn in_response_to(mut self, responses: Vec<String>) -> Self {
        self.in_response_to = Some(responses);
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A statement together with its stored fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The canonical statement text; also the storage key.
    pub text: String,
    #[serde(flatten)]
    pub fields: StatementFields,
}

impl Statement {
    pub fn new(text: impl Into<String>, fields: StatementFields) -> Self {
        Self {
            text: text.into(),
            fields,
        }
    }

    /// A statement with no stored fields.
    pub fn bare(text: impl Into<String>) -> Self {
        Self::new(text, StatementFields::default())
    }

    /// `true` if this statement was recorded as a reply to `previous`.
    pub fn responds_to(&self, previous: &str) -> bool {
        self.fields.in_response_to.iter().any(|s| s == previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fields_are_empty() {
        assert!(StatementFields::default().is_empty());
    }

    #[test]
    fn apply_only_overwrites_present_fields() {
        let mut fields = StatementFields {
            occurrence: Some(3),
            in_response_to: vec!["Hello".to_string()],
            date: None,
            name: Some("alice".to_string()),
        };
        fields.apply(FieldUpdate::new().occurrence(4));

        assert_eq!(fields.occurrence, Some(4));
        assert_eq!(fields.in_response_to, vec!["Hello".to_string()]);
        assert_eq!(fields.name.as_deref(), Some("alice"));
    }

    #[test]
    fn apply_replaces_response_list() {
        let mut fields = StatementFields::default();
        fields.apply(FieldUpdate::new().in_response_to(vec!["a".into(), "b".into()]));
        assert_eq!(fields.in_response_to, vec!["a".to_string(), "b".to_string()]);
        assert!(!fields.is_empty());
    }

    #[test]
    fn statement_json_is_flat() {
        let statement = Statement::new(
            "Hi there",
            StatementFields {
                occurrence: Some(1),
                in_response_to: vec!["Hello".to_string()],
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["text"], "Hi there");
        assert_eq!(json["occurrence"], 1);
        assert_eq!(json["in_response_to"][0], "Hello");
        assert!(json.get("date").is_none());
    }

    #[test]
    fn statement_json_missing_fields_default() {
        let statement: Statement = serde_json::from_str(r#"{"text":"Hey"}"#).unwrap();
        assert_eq!(statement.text, "Hey");
        assert!(statement.fields.is_empty());
    }

    #[test]
    fn responds_to_checks_response_list() {
        let mut statement = Statement::bare("Hey");
        assert!(!statement.responds_to("Hello"));
        statement.fields.in_response_to.push("Hello".to_string());
        assert!(statement.responds_to("Hello"));
    }
}
