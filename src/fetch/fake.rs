// src/fetch/fake.rs
// Canned JsonSource for tests: fixed responses, scripted failures, request log.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::JsonSource;
use crate::error::{CrawlError, Result};

#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, Value>,
    failures: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `value` for the request URL `url`.
    pub fn with(mut self, url: &str, value: Value) -> Self {
        self.responses.insert(url.to_string(), value);
        self
    }

    /// Answers `url` with an HTTP 500 transport error.
    pub fn failing(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonSource for FakeSource {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.failures.contains(url) {
            return Err(CrawlError::transport(url, "HTTP 500 Internal Server Error"));
        }

        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| CrawlError::transport(url, "HTTP 404 Not Found"))
    }
}

// JSON the API returns for post `id`; `body` is raw HTML and gets escaped the
// way the API escapes it
pub fn post_json(id: &str, title: &str, author: &str, body: &str) -> Value {
    let escaped = html_escape::encode_text(body).into_owned();
    json!([
        {
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "author": author,
                        "title": title,
                        "name": format!("t3_{}", id),
                        "selftext_html": escaped,
                        "url": format!("https://www.reddit.com/r/HFY/comments/{}/slug/", id)
                    }
                }]
            }
        },
        { "kind": "Listing", "data": { "children": [] } }
    ])
}

/// Request URL the collector uses for post `id`.
pub fn post_key(id: &str) -> String {
    format!("https://www.reddit.com/comments/{}.json", id)
}

pub fn wiki_json(content_html: &str) -> Value {
    json!({
        "kind": "wikipage",
        "data": { "content_html": html_escape::encode_text(content_html).into_owned() }
    })
}
