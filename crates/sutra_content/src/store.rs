//! Chapter store: loading and lookup.

use crate::record::{Chapter, VerseRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Built-in chapters, embedded so the runtime works without a content
/// directory on disk.
const DEFAULT_CHAPTERS: &str = include_str!("../data/chapters.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The animation id a verse maps to.
///
/// Scenes are registered under this id; verse records never select
/// animations by list position.
pub fn animation_id(chapter: u32, verse: u32) -> String {
    format!("verse-{chapter}-{verse}")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterFile {
    chapters: Vec<Chapter>,
}

/// Read-only store of every chapter's verse records.
#[derive(Debug)]
pub struct ChapterStore {
    chapters: Vec<Chapter>,
}

impl ChapterStore {
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let file: ChapterFile = serde_json::from_str(json)?;
        Ok(Self {
            chapters: file.chapters,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The embedded default content.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json_str(DEFAULT_CHAPTERS)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    pub fn verse(&self, chapter: u32, verse: u32) -> Option<&VerseRecord> {
        self.chapter(chapter)?.verse(verse)
    }
}
