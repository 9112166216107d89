// src/fetch/http.rs
// =============================================================================
// The real network source.
//
// One GET per call, admitted through the shared RateLimiter. Anything other
// than HTTP 200 with a JSON body is a transport failure carrying the URL and
// the status text. There is no retry: one failed attempt ends that call.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{JsonSource, RateLimiter};
use crate::error::{CrawlError, Result};

pub struct HttpSource {
    client: Client,
    limiter: Arc<RateLimiter>,
}

impl HttpSource {
    // Creates a source with its own HTTP client
    //
    // Parameters:
    //   limiter: shared with every other source that should respect the same gap
    //   user_agent: sent with every request (the API rejects blank agents)
    //   timeout: per-request timeout enforced by reqwest
    pub fn new(limiter: Arc<RateLimiter>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, limiter })
    }

    async fn get(&self, url: &str) -> Result<Value> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrawlError::transport(url, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CrawlError::transport(url, describe_status(status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CrawlError::transport(url, format!("invalid JSON body: {}", e)))
    }
}

#[async_trait]
impl JsonSource for HttpSource {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let result = self.limiter.admit(self.get(url)).await;
        if let Err(e) = &result {
            warn!(%url, error = %e, "request failed");
        }
        result
    }
}

// "HTTP 404 Not Found" style text for errors
fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn source(interval_ms: u64) -> HttpSource {
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(interval_ms)));
        HttpSource::new(limiter, "series-crawler-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_json_ok() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/comments/abc.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "Listing"})))
            .mount(&mock_server)
            .await;

        let url = format!("{}/comments/abc.json", mock_server.uri());
        let value = source(0).fetch_json(&url).await.unwrap();
        assert_eq!(value["kind"], "Listing");
    }

    #[tokio::test]
    async fn test_non_200_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.json", mock_server.uri());
        let err = source(0).fetch_json(&url).await.unwrap_err();

        match err {
            CrawlError::Transport { url: failed, reason } => {
                assert_eq!(failed, url);
                assert_eq!(reason, "HTTP 404 Not Found");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/comments/abc.json", addr);
        let err = source(0).fetch_json(&url).await.unwrap_err();

        match err {
            CrawlError::Transport { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/broken.json", mock_server.uri());
        let err = source(0).fetch_json(&url).await.unwrap_err();
        assert!(matches!(err, CrawlError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_requests_respect_min_interval() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/a.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&mock_server)
            .await;

        let url = format!("{}/a.json", mock_server.uri());
        let source = source(150);

        let started = Instant::now();
        source.fetch_json(&url).await.unwrap();
        source.fetch_json(&url).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}
