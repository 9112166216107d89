// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Two failures matter to callers and are kept apart:
// - Transport: the request itself failed (bad status, network, bad body)
// - Shape: the request worked but the JSON is not what we expected
//
// "Nothing found" (no parts, no next link) is NOT an error. Strategies return
// an empty or terminal result for that.
//
// The binary (main.rs) wraps these in anyhow for context. Everything under
// the engine returns the typed error so callers can match on the kind.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    /// Non-200 response, network failure, or a body that is not JSON
    #[error("Failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The payload did not have the structure we needed
    #[error("Unexpected data from {url}: {reason}")]
    Shape { url: String, reason: String },

    /// No post identifier could be recovered from the URL
    #[error("Not a post link: {0}")]
    InvalidUrl(String),

    #[error("Invalid next-link pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl CrawlError {
    pub fn transport(url: &str, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn shape(url: &str, reason: impl Into<String>) -> Self {
        Self::Shape {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
