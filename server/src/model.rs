//! The todo record and the text rules applied before anything reaches a store.
//!
//! # Design
//! `TodoText` is the only way to put text into a `Todo`, so a record holding
//! empty, untrimmed, or oversized text cannot be constructed. The create gate
//! (`CreateRule`) runs in front of that and decides whether a request body is
//! admitted at all.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on todo text, counted in characters after trimming.
pub const MAX_TEXT_CHARS: usize = 500;

/// Trimmed length the legacy create gate refuses.
const LEGACY_REJECTED_LEN: usize = 10;

pub type TodoId = Uuid;

/// A single todo item as stored and as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh, incomplete record with a new id. Called by stores only;
    /// ids are never chosen by clients.
    pub fn new(text: TodoText) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4(),
            text: text.into_inner(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_text(&mut self, text: TodoText) {
        self.text = text.into_inner();
        self.touch();
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.touch();
    }

    fn touch(&mut self) {
        // Clock skew must not break updated_at >= created_at.
        self.updated_at = now().max(self.created_at);
    }
}

/// Current time at millisecond precision, the resolution both stores keep.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Trimmed, non-empty, length-bounded todo text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoText(String);

impl TodoText {
    pub fn parse(raw: &str) -> Result<Self, TextError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(TextError::TooLong { len });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("Todo text is required")]
    Empty,
    #[error("Todo text cannot exceed {MAX_TEXT_CHARS} characters")]
    TooLong { len: usize },
}

/// Gate applied to the `text` of a create request before it is parsed.
///
/// `Legacy` reproduces the deployed behavior, which also refuses text whose
/// trimmed length is exactly ten characters. That looks like a mistyped
/// emptiness check; `NonEmpty` is the corrected rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CreateRule {
    #[default]
    Legacy,
    NonEmpty,
}

impl CreateRule {
    pub fn admits(self, text: Option<&str>) -> bool {
        let Some(text) = text else {
            return false;
        };
        if text.is_empty() {
            return false;
        }
        match self {
            CreateRule::Legacy => text.trim().chars().count() != LEGACY_REJECTED_LEN,
            CreateRule::NonEmpty => !text.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed() {
        let text = TodoText::parse("  walk the dog \n").unwrap();
        assert_eq!(text.as_str(), "walk the dog");
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert_eq!(TodoText::parse("   \t"), Err(TextError::Empty));
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let at_limit = "é".repeat(MAX_TEXT_CHARS);
        assert!(TodoText::parse(&at_limit).is_ok());

        let over = "x".repeat(MAX_TEXT_CHARS + 1);
        assert_eq!(
            TodoText::parse(&over),
            Err(TextError::TooLong {
                len: MAX_TEXT_CHARS + 1
            })
        );
    }

    #[test]
    fn legacy_rule_rejects_ten_character_text() {
        let rule = CreateRule::Legacy;
        assert!(!rule.admits(None));
        assert!(!rule.admits(Some("")));
        assert!(!rule.admits(Some("0123456789")));
        assert!(!rule.admits(Some("  0123456789  ")));
        assert!(rule.admits(Some("012345678")));
        assert!(rule.admits(Some("01234567890")));
    }

    #[test]
    fn non_empty_rule_accepts_ten_character_text() {
        let rule = CreateRule::NonEmpty;
        assert!(rule.admits(Some("0123456789")));
        assert!(!rule.admits(Some("   ")));
        assert!(!rule.admits(None));
    }

    #[test]
    fn new_todo_is_incomplete_with_equal_timestamps() {
        let todo = Todo::new(TodoText::parse("Buy milk").unwrap());
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn toggle_flips_and_refreshes_updated_at() {
        let mut todo = Todo::new(TodoText::parse("Buy milk").unwrap());
        todo.toggle();
        assert!(todo.completed);
        assert!(todo.updated_at >= todo.created_at);
        todo.toggle();
        assert!(!todo.completed);
    }

    #[test]
    fn todo_serializes_with_camel_case_timestamps() {
        let mut todo = Todo::new(TodoText::parse("Test").unwrap());
        todo.id = Uuid::nil();
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["completed"], false);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }
}
