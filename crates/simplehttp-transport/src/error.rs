//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be created
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Configuration value rejected during validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The built request cannot be sent (e.g. relative URI)
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),

    /// Timeout error
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Any other HTTP-level failure reported by the client
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Request or response handling error from simplehttp
    #[error(transparent)]
    SimpleHttp(#[from] simplehttp::Error),
}

impl TransportError {
    /// Map a send failure from reqwest onto a transport error
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connection(err)
        } else if err.is_builder() {
            Self::InvalidRequest(err)
        } else {
            Self::Http(err)
        }
    }

    /// Check if retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}
