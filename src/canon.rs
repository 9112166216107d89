// src/canon.rs
// =============================================================================
// This module turns any accepted post URL into one canonical identity.
//
// Accepted forms:
// - Short links:  https://redd.it/abc123
// - Long links:   https://www.reddit.com/r/sub/comments/abc123/some_title/
//                 (old./new./m. hosts and relative "/r/sub/comments/..." too)
//
// Everything downstream (fetching, caching, "have we seen this?") works on the
// normalized URL, so a short link and a long link to the same post share one
// cache entry and count as the same part of a series.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use url::Url;

// Tried first: redd.it/<id>
static SHORT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?redd\.it/([a-z0-9]+)").unwrap()
});

// Tried second: [host]/[r/<sub>]/comments/<id>
static LONG_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:https?://)?(?:[a-z0-9-]+\.)?reddit\.com)?(?:/r/[a-z0-9_]+)?/comments/([a-z0-9]+)(?:[/?#]|$)",
    )
    .unwrap()
});

const CANONICAL_BASE: &str = "https://www.reddit.com/comments/";

/// Lowercase alphanumeric token naming one post.
///
/// This is the only deduplication key in the crate: two URLs with the same
/// `PostId` are the same post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// Extracts the post identifier from a short or long URL
//
// Returns None for anything that isn't a post link (wiki pages, user pages,
// external sites...). Callers treat None as "not a post".
pub fn extract_identifier(url: &str) -> Option<PostId> {
    let url = url.trim();

    SHORT_LINK
        .captures(url)
        .or_else(|| LONG_LINK.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| PostId(m.as_str().to_lowercase()))
}

/// Builds the long-form URL for an identifier.
pub fn canonical_url(id: &PostId) -> String {
    format!("{}{}/", CANONICAL_BASE, id)
}

// normalize(url) = canonical_url(extract_identifier(url))
//
// Idempotent: the canonical URL matches the long-link pattern and yields the
// same identifier back.
pub fn normalize(url: &str) -> Option<String> {
    extract_identifier(url).map(|id| canonical_url(&id))
}

// Builds the URL actually requested from the API
//
// The API serves JSON when ".json" is appended to the path:
//   https://www.reddit.com/comments/abc/      -> .../comments/abc.json
//   https://www.reddit.com/r/x/wiki/series    -> .../wiki/series.json
// The query string (if any) is kept after the suffix.
pub fn json_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let path = parsed.path().trim_end_matches('/').to_string();
            if !path.ends_with(".json") {
                parsed.set_path(&format!("{}.json", path));
            }
            parsed.to_string()
        }
        Err(_) => {
            let trimmed = url.trim_end_matches('/');
            if trimmed.ends_with(".json") {
                trimmed.to_string()
            } else {
                format!("{}.json", trimmed)
            }
        }
    }
}
