// src/fetch/mod.rs
// =============================================================================
// This module gets JSON from the forum API.
//
// Submodules:
// - limiter: Spaces requests out (one at a time, minimum gap between them)
// - http: The real network source, built on reqwest + the limiter
// - cache: Remembers successful responses for the rest of the session
//
// Everything above this layer talks to a `JsonSource`, so tests can swap the
// network out for canned responses.
// =============================================================================

mod cache;
mod http;
mod limiter;

#[cfg(test)]
pub mod fake;

pub use cache::ResponseCache;
pub use http::HttpSource;
pub use limiter::RateLimiter;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Anything that can turn a request URL into parsed JSON.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}
