//! Verse and chapter records.
//!
//! Field names stay camelCase on the wire for parity with the authoring
//! data this store ingests.

use serde::{Deserialize, Serialize};

/// One verse paired with its physics analogy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub number: u32,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub concept_summary: String,
    #[serde(default)]
    pub analogy_summary: String,
    #[serde(default)]
    pub accessible_explanation: String,
    #[serde(default)]
    pub interaction_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    pub verses: Vec<VerseRecord>,
}

impl Chapter {
    /// Look a verse up by its explicit number, never by list position.
    pub fn verse(&self, number: u32) -> Option<&VerseRecord> {
        self.verses.iter().find(|v| v.number == number)
    }

    pub fn verse_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.verses.iter().map(|v| v.number)
    }
}

/// Caption text shown next to a visualization. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub heading: String,
    pub body: String,
    pub hint: String,
}

impl Caption {
    /// Assemble a caption, substituting defaults for any blank field so
    /// the page always has text to show.
    pub fn for_record(record: &VerseRecord) -> Self {
        let heading = if record.title.trim().is_empty() {
            format!("Verse {}", record.number)
        } else {
            format!("{} — {}", record.number, record.title)
        };
        let body = if record.text.trim().is_empty() {
            record.accessible_explanation.trim().to_string()
        } else {
            record.text.trim().to_string()
        };
        let body = if body.is_empty() {
            format!("Verse {} has no text recorded.", record.number)
        } else {
            body
        };
        let hint = if record.interaction_hint.trim().is_empty() {
            "Watch the motion settle.".to_string()
        } else {
            record.interaction_hint.trim().to_string()
        };
        Self {
            heading,
            body,
            hint,
        }
    }
}
