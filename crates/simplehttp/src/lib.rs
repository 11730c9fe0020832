//! # simplehttp
//!
//! Less boilerplate around HTTP requests and responses:
//! - [`RequestBuilder`]: method, URI, headers, bearer authorization and JSON
//!   body through chained calls
//! - [`SimpleHttpResponse`]: status checks, header lookup and JSON
//!   deserialization on top of a [`reqwest::Response`]
//!
//! Sending is left to the HTTP client. Connection pooling, retries, redirects
//! and TLS are whatever that client does.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simplehttp::{Method, RequestBuilder, SimpleHttpResponse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = RequestBuilder::parse(Method::POST, "https://example.com/people")?
//!         .with_bearer_token("tok")?
//!         .with_json_body(&serde_json::json!({"FirstName": "John"}))?
//!         .build();
//!
//!     let raw = reqwest::Client::new()
//!         .execute(reqwest::Request::try_from(request)?)
//!         .await?;
//!
//!     let mut response = SimpleHttpResponse::new(raw).ensure_success_status_code()?;
//!     let created: serde_json::Value = response.deserialize_json_content().await?;
//!     println!("{created}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use body::Body;
pub use error::{Error, Result};
pub use json::{DeserializeOptions, SerializeOptions};
pub use request::{BEARER_PREFIX, JSON_CONTENT_TYPE, Request, RequestBuilder};
pub use response::SimpleHttpResponse;

// Module declarations
pub mod body;
pub mod error;
pub mod json;
pub mod observability;
pub mod request;
pub mod response;


// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
pub use tokio_util::sync::CancellationToken;
