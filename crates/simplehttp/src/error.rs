//! Error types for simplehttp
//!
//! Every fallible builder or response operation reports one of these variants
//! at the point of the offending call. Nothing is retried or swallowed.

use http::StatusCode;
use thiserror::Error;

/// Result type alias for simplehttp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for simplehttp.
#[derive(Debug, Error)]
pub enum Error {
    /// A URI string could not be parsed.
    #[error("Invalid URI '{input}': {source}")]
    InvalidUri {
        /// The rejected input
        input: String,
        /// Parser error
        #[source]
        source: http::uri::InvalidUri,
    },

    /// A header name or value was rejected.
    #[error("Invalid HTTP header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as supplied by the caller
        name: String,
        /// Why the header was rejected
        reason: String,
    },

    /// Conversion between a value and JSON failed.
    #[error("JSON serialization failed: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// The response status is outside the 2xx range.
    #[error(
        "Response status code does not indicate success: {} ({})",
        .status.as_u16(),
        .reason.as_deref().unwrap_or("Unknown")
    )]
    UnsuccessfulResponse {
        /// HTTP status code
        status: StatusCode,
        /// Reason phrase for the status, if one is known
        reason: Option<String>,
    },

    /// The requested header is not present on the response.
    #[error("Header not found: {0}")]
    HeaderNotFound(String),

    /// Reading the response body from the transport failed.
    #[error("Failed to read response body: {0}")]
    TransportRead(#[source] reqwest::Error),

    /// The body read was cancelled.
    #[error("Response body read was cancelled")]
    Cancelled,

    /// The response body has already been read.
    #[error("Response body has already been consumed")]
    BodyConsumed,

    /// The response body exceeded the configured limit.
    #[error("Response body exceeds limit of {limit} bytes")]
    BodyTooLarge {
        /// Configured limit in bytes
        limit: usize,
    },
}

impl Error {
    pub(crate) fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error was caused by caller input rather than by the
    /// response or the transport.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::InvalidUri { .. } | Error::InvalidHeader { .. } | Error::BodyConsumed
        )
    }

    /// Status code carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UnsuccessfulResponse { status, .. } => Some(*status),
            Error::TransportRead(e) => e.status(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationFailed(err)
    }
}
