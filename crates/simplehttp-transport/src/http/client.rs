//! HTTP transport client implementation
//!
//! Implements the Transport trait on top of `reqwest::Client`. Pooling,
//! redirects and TLS are left to reqwest.

use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::traits::Transport;
use async_trait::async_trait;
use http::{HeaderMap, HeaderValue};
use http::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client as ReqwestClient;
use secrecy::ExposeSecret;
use simplehttp::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use simplehttp::{BEARER_PREFIX, Request};
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport implementation
///
/// Converts built requests into `reqwest::Request`s, applies the configured
/// defaults and logs each exchange.
///
/// Default headers are added per request rather than handed to reqwest, so a
/// name configured with several values sends all of them. A name the request
/// already carries is left untouched.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    default_headers: HeaderMap,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        config.validate()?;

        let mut default_headers = config.default_headers.clone();
        if let Some(token) = &config.bearer_token {
            let mut value =
                HeaderValue::from_str(&format!("{BEARER_PREFIX} {}", token.expose_secret()))
                    .map_err(|e| TransportError::Config(format!("invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }
        if !default_headers.contains_key(USER_AGENT) {
            let value = HeaderValue::from_str(&config.user_agent)
                .map_err(|e| TransportError::Config(format!("invalid user agent: {e}")))?;
            default_headers.insert(USER_AGENT, value);
        }

        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| TransportError::HttpClient(e.to_string()))?;

        tracing::debug!(
            timeout_ms = config.timeout.as_millis() as u64,
            connect_timeout_ms = config.connect_timeout.as_millis() as u64,
            has_bearer_token = config.bearer_token.is_some(),
            "Created HTTP transport"
        );

        Ok(Self {
            client: Arc::new(client),
            default_headers,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing reqwest client
    ///
    /// The client's own defaults apply; `timeout` is only reported by
    /// [`timeout`](Self::timeout).
    pub fn from_client(client: ReqwestClient, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            default_headers: HeaderMap::new(),
            timeout,
        }
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }

    /// Get the configured request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the headers added to every request that does not set them
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    fn apply_default_headers(&self, headers: &mut HeaderMap) {
        for name in self.default_headers.keys() {
            if headers.contains_key(name) {
                continue;
            }
            for value in self.default_headers.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, mut request: Request) -> Result<reqwest::Response> {
        self.apply_default_headers(request.headers_mut());
        let metadata = RequestMetadata::from_request(&request);
        let request = reqwest::Request::try_from(request).map_err(TransportError::InvalidRequest)?;

        metadata.log_request();
        let timer = RequestTimer::start();

        match self.client.execute(request).await {
            Ok(response) => {
                ResponseMetadata::from_response(&response, timer.elapsed()).log_success(&metadata);
                Ok(response)
            }
            Err(err) => {
                ResponseMetadata::log_error(&metadata, timer.elapsed(), &err.to_string());
                Err(TransportError::from_send(err))
            }
        }
    }
}
