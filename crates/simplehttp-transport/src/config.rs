//! Configuration for the HTTP transport

use crate::error::{Result, TransportError};
use http::{HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;
use std::time::Duration;

/// Default `User-Agent` sent by [`HttpTransport`](crate::HttpTransport).
pub const DEFAULT_USER_AGENT: &str = concat!("simplehttp/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP transport.
///
/// Everything here is handed to `reqwest::Client`; pooling, redirects and
/// TLS stay at reqwest's defaults.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// `User-Agent` header value
    pub user_agent: String,

    /// Headers sent with every request unless the request sets them itself
    pub default_headers: HeaderMap,

    /// Bearer token sent with every request that has no `Authorization`
    pub bearer_token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            connect_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: HeaderMap::new(),
            bearer_token: None,
        }
    }
}

impl TransportConfig {
    /// Create a builder.
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if one exists. Recognized variables:
    /// - `SIMPLEHTTP_TIMEOUT` for request timeout (in seconds)
    /// - `SIMPLEHTTP_CONNECT_TIMEOUT` for connection timeout (in seconds)
    /// - `SIMPLEHTTP_USER_AGENT` for the `User-Agent` header
    /// - `SIMPLEHTTP_BEARER_TOKEN` for a default bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is set but is not a positive
    /// integer.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(timeout) = env::var("SIMPLEHTTP_TIMEOUT") {
            config.timeout = parse_seconds("SIMPLEHTTP_TIMEOUT", &timeout)?;
        }

        if let Ok(timeout) = env::var("SIMPLEHTTP_CONNECT_TIMEOUT") {
            config.connect_timeout = parse_seconds("SIMPLEHTTP_CONNECT_TIMEOUT", &timeout)?;
        }

        if let Ok(user_agent) = env::var("SIMPLEHTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(token) = env::var("SIMPLEHTTP_BEARER_TOKEN")
            && !token.is_empty()
        {
            config.bearer_token = Some(SecretString::new(token.into_boxed_str()));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values reqwest would accept but that make
    /// every request fail.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(TransportError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(TransportError::Config(
                "connect_timeout must be greater than zero".to_string(),
            ));
        }
        HeaderValue::from_str(&self.user_agent)
            .map_err(|e| TransportError::Config(format!("invalid user agent: {e}")))?;
        Ok(())
    }
}

#[cfg(feature = "env")]
fn parse_seconds(var: &str, value: &str) -> Result<Duration> {
    value
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| TransportError::Config(format!("{var} must be a positive integer")))
}

/// Builder for creating TransportConfig with a fluent API.
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the maximum number of idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set a default bearer token.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Add a default header. Repeated names keep every value.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (key, value) = (key.as_ref(), value.as_ref());

        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| TransportError::Config(format!("invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Config(format!("invalid value for '{key}': {e}")))?;

        self.config.default_headers.append(name, value);
        Ok(self)
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// See [`TransportConfig::validate`].
    pub fn build(self) -> Result<TransportConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
