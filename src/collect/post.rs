// src/collect/post.rs
// =============================================================================
// Fetches one post and turns the API's JSON into a `Post`.
//
// The post endpoint answers with an array of listings. The first listing's
// first child is the post itself:
//
//   [ { "data": { "children": [ { "data": { author, title, name,
//                                           selftext_html, url } } ] } },
//     ...comments... ]
//
// The body markup comes entity-escaped ("&lt;p&gt;..."), so it is decoded
// before anyone parses it.
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::canon::{canonical_url, extract_identifier, normalize, PostId};
use crate::error::{CrawlError, Result};
use crate::fetch::{JsonSource, ResponseCache};

/// A reference to a post that has not been fetched yet.
///
/// `name` is always derived from `url`, so code that deduplicates by name
/// can trust it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRef {
    pub name: Option<PostId>,
    pub title: String,
    pub url: String,
}

impl PostRef {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: extract_identifier(&url),
            title: title.into(),
            url,
        }
    }

    /// A reference with no listing title (e.g. a URL typed on the command line).
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(String::new(), url)
    }
}

/// A fetched post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub author: String,
    pub title: String,
    pub name: PostId,
    /// Decoded body markup (HTML)
    pub content: String,
    /// Source URL as reported by the API
    pub url: String,
}

// The fields we need from children[0].data. Missing ones fail deserialization,
// which surfaces as a shape error.
#[derive(Debug, Deserialize)]
struct RawPost {
    author: String,
    title: String,
    // Fullname ("t3_<id>"); required so an unexpected object is rejected
    #[allow(dead_code)]
    name: String,
    // Link posts have no body
    selftext_html: Option<String>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RawPost,
}

/// Fetches posts through the session cache.
///
/// Every strategy in this crate goes through one `Collector`, so they all
/// share the cache and (through the source) the rate limiter.
pub struct Collector<S> {
    cache: ResponseCache<S>,
}

impl<S: JsonSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self {
            cache: ResponseCache::new(source),
        }
    }

    pub fn cache(&self) -> &ResponseCache<S> {
        &self.cache
    }

    // Whether the post behind `url` is already in the cache
    //
    // Short and long links to the same post give the same answer.
    pub fn is_post_cached(&self, url: &str) -> bool {
        normalize(url).is_some_and(|canonical| self.cache.is_cached(&canonical))
    }

    // Fetches one post
    //
    // Parameters:
    //   url: short or long post link
    //
    // Returns: the Post, or
    //   InvalidUrl if no identifier can be found in `url`
    //   Transport if the request failed
    //   Shape if the response isn't a post listing
    pub async fn collect_post(&self, url: &str) -> Result<Post> {
        let id = extract_identifier(url).ok_or_else(|| CrawlError::InvalidUrl(url.to_string()))?;
        let canonical = canonical_url(&id);

        let response = self.cache.fetch(&canonical).await?;
        let raw = parse_post(&canonical, response)?;

        let post = Post {
            author: raw.author,
            title: raw.title,
            name: id,
            content: raw
                .selftext_html
                .map(|html| html_escape::decode_html_entities(&html).into_owned())
                .unwrap_or_default(),
            url: raw.url,
        };

        info!(name = %post.name, title = %post.title, "collected post");
        Ok(post)
    }
}

fn parse_post(url: &str, response: Value) -> Result<RawPost> {
    let first = match response {
        Value::Array(mut listings) if !listings.is_empty() => listings.swap_remove(0),
        _ => return Err(CrawlError::shape(url, "expected a non-empty array of listings")),
    };

    let listing: Listing = serde_json::from_value(first)
        .map_err(|e| CrawlError::shape(url, format!("malformed post listing: {}", e)))?;

    listing
        .data
        .children
        .into_iter()
        .next()
        .map(|child| child.data)
        .ok_or_else(|| CrawlError::shape(url, "post listing has no children"))
}
