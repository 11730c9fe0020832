//! Structured logging helpers for request/response exchanges
//!
//! Transports log every exchange through these types so the field names stay
//! the same everywhere.

use crate::request::Request;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI
    pub uri: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            body_size: None,
        }
    }

    /// Capture metadata from a built request
    pub fn from_request(request: &Request) -> Self {
        let metadata = Self::new(request.method().as_str(), request.uri().to_string());
        match request.body().len() {
            0 => metadata,
            size => metadata.with_body_size(size),
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            uri = %self.uri,
            body_size = self.body_size,
            "Sending HTTP request"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Content length reported by the server (optional)
    pub content_length: Option<u64>,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            content_length: None,
            elapsed,
        }
    }

    /// Capture metadata from a received response
    pub fn from_response(response: &reqwest::Response, elapsed: Duration) -> Self {
        Self {
            status: response.status().as_u16(),
            content_length: response.content_length(),
            elapsed,
        }
    }

    /// Log a completed exchange
    ///
    /// Any status counts as completed; status inspection is the caller's job.
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            uri = %request.uri,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            content_length = self.content_length,
            "HTTP request completed"
        );
    }

    /// Log a failed exchange
    pub fn log_error(request: &RequestMetadata, elapsed: Duration, error: &str) {
        warn!(
            method = %request.method,
            uri = %request.uri,
            elapsed_ms = elapsed.as_millis(),
            error = %error,
            "HTTP request failed"
        );
    }
}

/// Timer for measuring request duration
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBuilder;
    use http::Method;

    #[test]
    fn test_request_metadata_creation() {
        let metadata = RequestMetadata::new("POST", "/v1/items");
        assert_eq!(metadata.method, "POST");
        assert_eq!(metadata.uri, "/v1/items");
        assert_eq!(metadata.body_size, None);
    }

    #[test]
    fn test_request_metadata_from_request() {
        let request = RequestBuilder::parse(Method::PATCH, "https://example.com/items/1")
            .unwrap()
            .with_json_body(&serde_json::json!({"a": 1}))
            .unwrap()
            .build();
        let metadata = RequestMetadata::from_request(&request);
        assert_eq!(metadata.method, "PATCH");
        assert_eq!(metadata.uri, "https://example.com/items/1");
        assert_eq!(metadata.body_size, Some(7));
    }

    #[test]
    fn test_request_metadata_without_body() {
        let request = RequestBuilder::new().build();
        assert_eq!(RequestMetadata::from_request(&request).body_size, None);
    }

    #[test]
    fn test_response_metadata_from_response() {
        let response: reqwest::Response = http::Response::builder()
            .status(503)
            .body("down")
            .unwrap()
            .into();
        let elapsed = Duration::from_millis(20);
        let metadata = ResponseMetadata::from_response(&response, elapsed);
        assert_eq!(metadata.status, 503);
        assert_eq!(metadata.elapsed, elapsed);
    }

    #[test]
    fn test_request_timer() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed().as_millis() >= 10);
    }

    #[test]
    fn test_logging_emits_under_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("simplehttp=trace"))
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let request = RequestMetadata::new("GET", "https://example.com").with_body_size(3);
            request.log_request();
            ResponseMetadata::new(200, Duration::from_millis(5)).log_success(&request);
            ResponseMetadata::log_error(&request, Duration::from_millis(5), "connection reset");
        });
    }
}
