//! Transport layer for simplehttp
//!
//! Sends requests built with [`simplehttp::RequestBuilder`] and hands back
//! the received response, optionally wrapped in
//! [`simplehttp::SimpleHttpResponse`].
//!
//! # Architecture
//!
//! - **Transport trait**: Generic interface for anything that can send a request
//! - **HTTP transport**: reqwest-backed implementation
//! - **Configuration**: timeouts, user agent, default headers and token
//! - **Error handling**: Unified transport error type
//!
//! # Usage
//!
//! ```no_run
//! use simplehttp::{Method, RequestBuilder};
//! use simplehttp_transport::{HttpTransport, Transport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let request = RequestBuilder::parse(Method::GET, "https://example.com/items")?
//!     .with_bearer_token("tok")?
//!     .build();
//! let items: serde_json::Value = transport
//!     .send(request)
//!     .await?
//!     .ensure_success_status_code()?
//!     .deserialize_json_content()
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::{Result, TransportError};
pub use crate::http::HttpTransport;
pub use traits::Transport;
