//! Transport trait
//!
//! Anything that can turn a built [`Request`] into a [`reqwest::Response`].

use crate::error::Result;
use async_trait::async_trait;
use simplehttp::{Request, SimpleHttpResponse};

/// Sends built requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response as received.
    ///
    /// Non-2xx statuses are not errors at this level.
    async fn execute(&self, request: Request) -> Result<reqwest::Response>;

    /// Send a request and wrap the response.
    async fn send(&self, request: Request) -> Result<SimpleHttpResponse> {
        let response = self.execute(request).await?;
        Ok(SimpleHttpResponse::new(response))
    }
}
