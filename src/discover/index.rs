// src/discover/index.rs
// =============================================================================
// Series discovery from an index (wiki) page.
//
// How it works:
// 1. Fetch the page (through the cache) and check it really is a wiki page
// 2. Title = first h1, else h2, else h3, else ""
// 3. Parts = every link that names a post, in document order
// 4. If there is at least one part, fetch the first one to learn the author
//    (and the title, when the page had no heading)
//
// Links that don't name a post are dropped; they are only logged at debug.
// =============================================================================

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::links::{extract_links, first_heading};
use crate::collect::{Collector, PostRef};
use crate::error::{CrawlError, Result};
use crate::fetch::JsonSource;

/// A titled, authored, ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub title: String,
    pub author: String,
    pub parts: Vec<PostRef>,
}

pub async fn discover_from_index<S: JsonSource>(
    collector: &Collector<S>,
    url: &str,
) -> Result<Series> {
    let response = collector.cache().fetch(url).await?;
    let markup = wiki_markup(url, &response)?;

    let mut title = first_heading(&markup).unwrap_or_default();
    let parts = find_parts(&markup);

    info!(%url, parts = parts.len(), "index page parsed");

    let mut author = String::new();
    if let Some(first) = parts.first() {
        let post = collector.collect_post(&first.url).await?;
        author = post.author;
        if title.is_empty() {
            title = post.title;
        }
    }

    Ok(Series {
        title,
        author,
        parts,
    })
}

// Checks the payload is { kind: "wikipage", data: { content_html } } and
// returns the decoded markup
fn wiki_markup(url: &str, response: &Value) -> Result<String> {
    match response.get("kind").and_then(Value::as_str) {
        Some("wikipage") => {}
        Some(other) => {
            return Err(CrawlError::shape(
                url,
                format!("expected a wiki page, got \"{}\"", other),
            ))
        }
        None => return Err(CrawlError::shape(url, "expected a wiki page")),
    }

    let html = response
        .pointer("/data/content_html")
        .and_then(Value::as_str)
        .ok_or_else(|| CrawlError::shape(url, "wiki page has no content_html"))?;

    Ok(html_escape::decode_html_entities(html).into_owned())
}

fn find_parts(markup: &str) -> Vec<PostRef> {
    extract_links(markup)
        .into_iter()
        .filter_map(|link| {
            let part = PostRef::new(link.text, link.href);
            if part.name.is_none() {
                debug!(href = %part.url, "index link is not a post, skipping");
                return None;
            }
            Some(part)
        })
        .collect()
}
