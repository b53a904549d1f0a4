//! Wire types for the generated-media service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRequest {
    pub prompt: String,
    pub chapter: u32,
    pub verse: u32,
    /// Generation method hint forwarded to the upstream, e.g. "animation".
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub animation_url: String,
    pub thumbnail_url: String,
    pub chapter: u32,
    pub verse: u32,
    /// True when the payload came from the fallback catalog rather than
    /// the upstream service.
    pub is_fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let response = MediaResponse {
            animation_url: "https://cdn.example/a.mp4".to_string(),
            thumbnail_url: "https://cdn.example/a.jpg".to_string(),
            chapter: 1,
            verse: 2,
            is_fallback: true,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"animationUrl\""));
        assert!(json.contains("\"isFallback\":true"));

        let back: MediaResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}
