//! The cache-and-fallback media client.

use crate::cache::{CacheKey, MediaCache};
use crate::fallback::FallbackCatalog;
use crate::types::{MediaRequest, MediaResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("upstream generator unreachable: {reason}")]
    Unreachable { reason: String },
    #[error("upstream generator rejected request: {reason}")]
    Rejected { reason: String },
}

/// The generative service behind the client. Injected so tests and
/// offline runs can substitute a double.
pub trait MediaUpstream {
    fn generate(&mut self, request: &MediaRequest) -> Result<MediaResponse, MediaError>;
}

/// Upstream for environments with no generator configured; every request
/// resolves through the fallback catalog.
pub struct OfflineUpstream;

impl MediaUpstream for OfflineUpstream {
    fn generate(&mut self, _request: &MediaRequest) -> Result<MediaResponse, MediaError> {
        Err(MediaError::Unreachable {
            reason: "no upstream configured".to_string(),
        })
    }
}

/// Client the page layer calls. `fetch` is infallible: it resolves to a
/// cache hit, an upstream success, or a deterministic fallback.
pub struct MediaClient {
    upstream: Box<dyn MediaUpstream>,
    cache: MediaCache,
    catalog: FallbackCatalog,
}

impl MediaClient {
    pub fn new(upstream: Box<dyn MediaUpstream>, cache: MediaCache) -> Self {
        Self {
            upstream,
            cache,
            catalog: FallbackCatalog::new(),
        }
    }

    pub fn fetch(&mut self, request: &MediaRequest) -> MediaResponse {
        let key = CacheKey::for_request(request);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(
                chapter = request.chapter,
                verse = request.verse,
                "media cache hit"
            );
            return hit.clone();
        }

        let response = match self.upstream.generate(request) {
            Ok(response) => response,
            Err(err) => {
                // Operator-facing only; the caller still gets a payload.
                tracing::warn!(
                    chapter = request.chapter,
                    verse = request.verse,
                    %err,
                    "media upstream failed, serving fallback"
                );
                self.catalog.resolve(request)
            }
        };

        self.cache.insert(key, response.clone());
        response
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
    fn test_failure_resolves_to_deterministic_fallback() {
        let mut client = MediaClient::new(
            Box::new(OfflineUpstream),
            MediaCache::with_capacity(8),
        );
        let a = client.fetch(&request("two entangled particles"));
        assert!(a.is_fallback);
        assert_eq!(
            a.animation_url,
            "https://static.sutra.example/fallback/entanglement.mp4"
        );

        // A different client, same prompt: identical payload.
        let mut other = MediaClient::new(
            Box::new(OfflineUpstream),
            MediaCache::with_capacity(8),
        );
        let b = other.fetch(&request("two entangled particles"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_upstream_called_once_per_key() {
        // Observable via a shared counter.
        use std::cell::Cell;
        use std::rc::Rc;

        struct SharedCounting {
            calls: Rc<Cell<u32>>,
        }
        impl MediaUpstream for SharedCounting {
            fn generate(&mut self, request: &MediaRequest) -> Result<MediaResponse, MediaError> {
                self.calls.set(self.calls.get() + 1);
                Ok(MediaResponse {
                    animation_url: "https://live.example/g.mp4".to_string(),
                    thumbnail_url: "https://live.example/g.jpg".to_string(),
                    chapter: request.chapter,
                    verse: request.verse,
                    is_fallback: false,
                })
            }
        }

        let calls = Rc::new(Cell::new(0));
        let mut client = MediaClient::new(
            Box::new(SharedCounting {
                calls: calls.clone(),
            }),
            MediaCache::with_capacity(8),
        );
        client.fetch(&request("the well of becoming"));
        client.fetch(&request("the well of becoming"));
        client.fetch(&request("the well of becoming"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_fallback_is_cached_too() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct FailingCounting {
            calls: Rc<Cell<u32>>,
        }
        impl MediaUpstream for FailingCounting {
            fn generate(&mut self, _request: &MediaRequest) -> Result<MediaResponse, MediaError> {
                self.calls.set(self.calls.get() + 1);
                Err(MediaError::Unreachable {
                    reason: "down".to_string(),
                })
            }
        }

        let calls = Rc::new(Cell::new(0));
        let mut client = MediaClient::new(
            Box::new(FailingCounting {
                calls: calls.clone(),
            }),
            MediaCache::with_capacity(8),
        );
        let a = client.fetch(&request("still water"));
        let b = client.fetch(&request("still water"));
        assert!(a.is_fallback);
        assert_eq!(a, b);
        // Second fetch came from cache; the dead upstream was not retried.
        assert_eq!(calls.get(), 1);
    }
}
