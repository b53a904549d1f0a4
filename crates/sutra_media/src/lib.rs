//! Sutra Media Layer
//!
//! Client for the generated-media service: an explicit bounded cache in
//! front of an injectable upstream, with deterministic concept-keyed
//! fallbacks when the upstream fails. Upstream failures are an operator
//! concern; callers always receive a payload.

pub mod cache;
pub mod client;
pub mod fallback;
pub mod types;

pub use cache::MediaCache;
pub use client::{MediaClient, MediaError, MediaUpstream, OfflineUpstream};
pub use fallback::FallbackCatalog;
pub use types::{MediaRequest, MediaResponse};
