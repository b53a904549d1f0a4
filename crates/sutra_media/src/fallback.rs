//! Concept-keyed fallback payloads.
//!
//! When the upstream generator is unreachable, the prompt is keyword-
//! matched against a fixed catalog in a fixed order, so the same prompt
//! always resolves to the same payload.

use crate::types::{MediaRequest, MediaResponse};

struct FallbackEntry {
    concept: &'static str,
    keywords: &'static [&'static str],
    animation_url: &'static str,
    thumbnail_url: &'static str,
}

/// Match order is significant: earlier entries win, and the final entry
/// is the catch-all.
const ENTRIES: &[FallbackEntry] = &[
    FallbackEntry {
        concept: "entanglement",
        keywords: &["entangle", "pair", "correlat"],
        animation_url: "https://static.sutra.example/fallback/entanglement.mp4",
        thumbnail_url: "https://static.sutra.example/fallback/entanglement.jpg",
    },
    FallbackEntry {
        concept: "measurement",
        keywords: &["collapse", "measure", "observ"],
        animation_url: "https://static.sutra.example/fallback/measurement.mp4",
        thumbnail_url: "https://static.sutra.example/fallback/measurement.jpg",
    },
    FallbackEntry {
        concept: "wave",
        keywords: &["wave", "oscillat", "field"],
        animation_url: "https://static.sutra.example/fallback/wave.mp4",
        thumbnail_url: "https://static.sutra.example/fallback/wave.jpg",
    },
    FallbackEntry {
        concept: "emission",
        keywords: &["emit", "spark", "creation", "source"],
        animation_url: "https://static.sutra.example/fallback/emission.mp4",
        thumbnail_url: "https://static.sutra.example/fallback/emission.jpg",
    },
    FallbackEntry {
        concept: "stillness",
        keywords: &[],
        animation_url: "https://static.sutra.example/fallback/stillness.mp4",
        thumbnail_url: "https://static.sutra.example/fallback/stillness.jpg",
    },
];

/// Deterministic prompt-to-payload resolution.
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn new() -> Self {
        Self
    }

    /// The concept an arbitrary prompt resolves to.
    pub fn concept_for(&self, prompt: &str) -> &'static str {
        let prompt = prompt.to_lowercase();
        for entry in ENTRIES {
            if entry.keywords.iter().any(|k| prompt.contains(k)) {
                return entry.concept;
            }
        }
        // Catch-all entry has no keywords.
        ENTRIES[ENTRIES.len() - 1].concept
    }

    pub fn resolve(&self, request: &MediaRequest) -> MediaResponse {
        let concept = self.concept_for(&request.prompt);
        let entry = ENTRIES
            .iter()
            .find(|e| e.concept == concept)
            .unwrap_or(&ENTRIES[ENTRIES.len() - 1]);
        MediaResponse {
            animation_url: entry.animation_url.to_string(),
            thumbnail_url: entry.thumbnail_url.to_string(),
            chapter: request.chapter,
            verse: request.verse,
            is_fallback: true,
        }
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> MediaRequest {
        MediaRequest {
            prompt: prompt.to_string(),
            chapter: 1,
            verse: 2,
            method: "animation".to_string(),
        }
    }

    #[test]
    fn test_keyword_selects_concept() {
        let catalog = FallbackCatalog::new();
        assert_eq!(
            catalog.concept_for("two entangled particles drifting"),
            "entanglement"
        );
        assert_eq!(catalog.concept_for("a WAVE crossing a field"), "wave");
        assert_eq!(catalog.concept_for("nothing matches this"), "stillness");
    }

    #[test]
    fn test_same_prompt_same_payload() {
        let catalog = FallbackCatalog::new();
        let a = catalog.resolve(&request("watch the collapse happen"));
        let b = catalog.resolve(&request("watch the collapse happen"));
        assert_eq!(a, b);
        assert_eq!(
            a.animation_url,
            "https://static.sutra.example/fallback/measurement.mp4"
        );
        assert!(a.is_fallback);
    }

    #[test]
    fn test_match_order_prefers_earlier_entries() {
        let catalog = FallbackCatalog::new();
        // "entangle" and "measure" both appear; the earlier entry wins.
        assert_eq!(
            catalog.concept_for("measure one entangled particle"),
            "entanglement"
        );
    }

    #[test]
    fn test_payload_echoes_chapter_and_verse() {
        let catalog = FallbackCatalog::new();
        let response = catalog.resolve(&MediaRequest {
            prompt: "sparks from the source".to_string(),
            chapter: 7,
            verse: 11,
            method: "animation".to_string(),
        });
        assert_eq!((response.chapter, response.verse), (7, 11));
    }
}
