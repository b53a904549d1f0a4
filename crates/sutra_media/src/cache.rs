//! Bounded response cache.
//!
//! Constructed once per process and passed explicitly; never ambient
//! module state. Keys combine chapter, verse, and a prompt prefix so
//! minor prompt rewording for the same verse still hits.

use crate::types::{MediaRequest, MediaResponse};
use std::collections::{HashMap, VecDeque};

/// How much of the prompt participates in the cache key.
const PROMPT_PREFIX_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    chapter: u32,
    verse: u32,
    prompt_prefix: String,
}

impl CacheKey {
    pub fn for_request(request: &MediaRequest) -> Self {
        let prefix: String = request.prompt.chars().take(PROMPT_PREFIX_LEN).collect();
        Self {
            chapter: request.chapter,
            verse: request.verse,
            prompt_prefix: prefix,
        }
    }
}

/// FIFO-bounded map: inserting past capacity evicts the oldest entry.
pub struct MediaCache {
    entries: HashMap<CacheKey, MediaResponse>,
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl MediaCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&MediaResponse> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, response: MediaResponse) {
        if self.entries.insert(key.clone(), response).is_some() {
            // Refreshed an existing key; insertion order is unchanged.
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                tracing::trace!(?oldest, "media cache evicted oldest entry");
            }
        }
    }
}
