//! Core data structures for the diarynotes application.
//!
//! This module contains the `Note` record stored in the diary.
use serde::{Deserialize, Serialize};

use crate::Category;

/// Represents a single diary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, derived from the creation time in milliseconds
    pub id: i64,
    /// Trimmed, non-empty note content
    pub text: String,
    /// Formatted creation timestamp, never changed by edits
    pub date: String,
    /// One of the fixed categories
    pub category: Category,
}

impl Note {
    /// Creates a new note. Callers are responsible for id uniqueness and text validation.
    pub fn new(id: i64, text: String, date: String, category: Category) -> Self {
        Note {
            id,
            text,
            date,
            category,
        }
    }

    /// Lower-cased text, used for case-insensitive matching
    pub fn folded_text(&self) -> String {
        self.text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_serializes_with_flat_fields() {
        let note = Note::new(
            1_700_000_000_000,
            "Buy milk".to_string(),
            "11/14/2023 10:13:20 PM".to_string(),
            Category::Work,
        );

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], 1_700_000_000_000_i64);
        assert_eq!(json["text"], "Buy milk");
        assert_eq!(json["date"], "11/14/2023 10:13:20 PM");
        assert_eq!(json["category"], "Work");
    }

    #[test]
    fn test_note_rejects_unknown_category() {
        let raw = r#"{"id":1,"text":"x","date":"d","category":"Hobby"}"#;
        assert!(serde_json::from_str::<Note>(raw).is_err());
    }
}
