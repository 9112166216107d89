// src/fetch/cache.rs
// =============================================================================
// Session cache in front of a JsonSource.
//
// - Key: the JSON request URL (canon::json_url of whatever the caller passed)
// - Hit: returned straight away, no request and no rate-limit wait
// - Miss: fetched, stored on success, nothing stored on failure
//
// Entries live as long as the cache does. There is no eviction.
// =============================================================================

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use super::JsonSource;
use crate::canon::json_url;
use crate::error::Result;

pub struct ResponseCache<S> {
    source: S,
    entries: Mutex<HashMap<String, Value>>,
}

impl<S: JsonSource> ResponseCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, url: &str) -> Result<Value> {
        let key = json_url(url);

        if let Some(value) = self.lookup(&key) {
            debug!(url = %key, "cache hit");
            return Ok(value);
        }

        debug!(url = %key, "cache miss");
        let value = self.source.fetch_json(&key).await?;

        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value.clone());

        Ok(value)
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.lookup(&json_url(url)).is_some()
    }

    fn lookup(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::FakeSource;
    use serde_json::json;

    const URL: &str = "https://www.reddit.com/comments/abc/";
    const KEY: &str = "https://www.reddit.com/comments/abc.json";

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let cache = ResponseCache::new(FakeSource::new().with(KEY, json!({"n": 1})));

        let first = cache.fetch(URL).await.unwrap();
        let second = cache.fetch(URL).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.source().requests(), vec![KEY.to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ResponseCache::new(FakeSource::new().failing(KEY));

        assert!(cache.fetch(URL).await.is_err());
        assert!(!cache.is_cached(URL));
        assert!(cache.fetch(URL).await.is_err());
        assert_eq!(cache.source().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_is_cached_uses_request_url() {
        let cache = ResponseCache::new(FakeSource::new().with(KEY, json!([])));
        assert!(!cache.is_cached(URL));

        cache.fetch(URL).await.unwrap();
        assert!(cache.is_cached(URL));
        assert!(cache.is_cached(KEY));
    }
}
