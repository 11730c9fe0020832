//! HTTP response wrapper

use crate::error::{Error, Result};
use crate::json::DeserializeOptions;
use http::{HeaderMap, HeaderValue, StatusCode};
use hyper::ext::ReasonPhrase;
use serde::de::DeserializeOwned;
use std::borrow::{Borrow, BorrowMut, Cow};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Thin wrapper around a received [`reqwest::Response`].
///
/// `R` decides who owns the response:
/// - `reqwest::Response`: the wrapper owns it; get it back with
///   [`into_raw_response`](Self::into_raw_response).
/// - `&mut reqwest::Response`: the caller keeps ownership; the wrapper can
///   still read the body.
/// - `&reqwest::Response`: metadata only, shareable across readers.
///
/// Metadata accessors compute their result from the wrapped response on every
/// call. The body can be read once; later reads fail with
/// [`Error::BodyConsumed`]. The consumed state is kept in the response
/// extensions, so wrapping the same response again does not reset it.
///
/// ```no_run
/// use serde::Deserialize;
/// use simplehttp::SimpleHttpResponse;
///
/// #[derive(Deserialize)]
/// struct Person {
///     #[serde(rename = "FirstName")]
///     first_name: String,
/// }
///
/// # async fn example(raw: reqwest::Response) -> simplehttp::Result<()> {
/// let mut response = SimpleHttpResponse::new(raw).ensure_success_status_code()?;
/// let request_id = response
///     .get_header_value("x-request-id")
///     .map(|value| value.into_owned());
/// let person: Person = response.deserialize_json_content().await?;
/// println!("{} ({:?})", person.first_name, request_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SimpleHttpResponse<R = reqwest::Response> {
    inner: R,
}

/// Set in the response extensions once a body read has started.
#[derive(Debug, Clone, Copy)]
struct BodyConsumedMarker;

impl<R: Borrow<reqwest::Response>> SimpleHttpResponse<R> {
    /// Wrap a received response. No I/O is performed.
    pub fn new(response: R) -> Self {
        Self { inner: response }
    }

    /// Get the status code.
    pub fn status_code(&self) -> StatusCode {
        self.get_raw_response().status()
    }

    /// Get the reason phrase for the status line.
    ///
    /// A non-standard phrase sent by the server is returned as is. Otherwise
    /// this is the canonical phrase for the status code, if one is defined.
    pub fn reason_phrase(&self) -> Option<&str> {
        self.get_raw_response()
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .or_else(|| self.status_code().canonical_reason())
    }

    /// Check if the status code is in the 200-299 range.
    pub fn is_success_status_code(&self) -> bool {
        self.status_code().is_success()
    }

    /// Fail unless the status code indicates success.
    ///
    /// Returns the wrapper unchanged on success so calls can be chained.
    ///
    /// # Errors
    /// Returns [`Error::UnsuccessfulResponse`] with the status and reason
    /// phrase when the status is outside 200-299.
    pub fn ensure_success_status_code(self) -> Result<Self> {
        if self.is_success_status_code() {
            return Ok(self);
        }
        Err(Error::UnsuccessfulResponse {
            status: self.status_code(),
            reason: self.reason_phrase().map(str::to_owned),
        })
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.get_raw_response().headers()
    }

    /// Get the first value of a header, or `None` if the header is missing.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`.
    pub fn get_header_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers().get(name).map(decode_header)
    }

    /// Get all values of a header, in the order they were received.
    ///
    /// # Errors
    /// Returns [`Error::HeaderNotFound`] if the response has no such header.
    pub fn get_header_values(&self, name: &str) -> Result<Vec<Cow<'_, str>>> {
        self.try_get_header_values(name)
            .ok_or_else(|| Error::HeaderNotFound(name.to_string()))
    }

    /// Get all values of a header, or `None` if the header is missing.
    pub fn try_get_header_values(&self, name: &str) -> Option<Vec<Cow<'_, str>>> {
        let headers = self.headers();
        if !headers.contains_key(name) {
            return None;
        }
        Some(headers.get_all(name).iter().map(decode_header).collect())
    }

    /// Get the `Content-Length` reported by the transport, if known.
    pub fn content_length(&self) -> Option<u64> {
        self.get_raw_response().content_length()
    }

    /// Get the final URL of the response.
    pub fn url(&self) -> &reqwest::Url {
        self.get_raw_response().url()
    }

    /// Check whether a read of the response body has already started.
    pub fn is_body_consumed(&self) -> bool {
        self.get_raw_response()
            .extensions()
            .get::<BodyConsumedMarker>()
            .is_some()
    }

    /// Get the wrapped response.
    pub fn get_raw_response(&self) -> &reqwest::Response {
        self.inner.borrow()
    }

    /// Unwrap and return whatever was passed to [`new`](Self::new).
    pub fn into_raw_response(self) -> R {
        self.inner
    }
}

impl<R: BorrowMut<reqwest::Response>> SimpleHttpResponse<R> {
    /// Read the whole body and deserialize it from JSON.
    ///
    /// # Errors
    /// See [`deserialize_json_content_opts`](Self::deserialize_json_content_opts).
    pub async fn deserialize_json_content<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.deserialize_json_content_opts(&DeserializeOptions::default(), None)
            .await
    }

    /// Read the whole body and deserialize it from JSON.
    ///
    /// The body is read chunk by chunk from the transport. When `cancel` is
    /// triggered the read stops with [`Error::Cancelled`]; dropping the future
    /// has the same effect. Either way the body counts as consumed.
    ///
    /// # Errors
    /// - [`Error::BodyConsumed`] if the body was already read, through this
    ///   wrapper or any other wrapping the same response.
    /// - [`Error::TransportRead`] if reading from the transport fails.
    /// - [`Error::BodyTooLarge`] if the body exceeds `options.max_body_size`.
    /// - [`Error::Cancelled`] if `cancel` fires first.
    /// - [`Error::SerializationFailed`] if the body is not valid JSON for `T`.
    pub async fn deserialize_json_content_opts<T: DeserializeOwned>(
        &mut self,
        options: &DeserializeOptions,
        cancel: Option<&CancellationToken>,
    ) -> Result<T> {
        let response: &mut reqwest::Response = self.inner.borrow_mut();
        if response
            .extensions_mut()
            .insert(BodyConsumedMarker)
            .is_some()
        {
            return Err(Error::BodyConsumed);
        }

        let bytes = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Response body read cancelled");
                    return Err(Error::Cancelled);
                }
                result = read_body(response, options.max_body_size) => result?,
            },
            None => read_body(response, options.max_body_size).await?,
        };

        debug!(body_size = bytes.len(), "Deserializing JSON response body");
        options.parse(&bytes)
    }
}

impl From<reqwest::Response> for SimpleHttpResponse {
    fn from(response: reqwest::Response) -> Self {
        Self::new(response)
    }
}

fn decode_header(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOCATION: usize = 1 << 20;

async fn read_body(response: &mut reqwest::Response, limit: Option<usize>) -> Result<Vec<u8>> {
    let hint = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    let mut buf = Vec::with_capacity(hint.min(limit.unwrap_or(MAX_PREALLOCATION)));

    while let Some(chunk) = response.chunk().await.map_err(Error::TransportRead)? {
        if let Some(limit) = limit
            && buf.len() + chunk.len() > limit
        {
            return Err(Error::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        #[serde(rename = "FirstName")]
        first_name: String,
        #[serde(rename = "LastName")]
        last_name: String,
    }

    fn raw(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .header("x-test", "value1")
            .header("x-test", "value2")
            .body(body)
            .unwrap()
            .into()
    }

    #[test]
    fn test_status_projections() {
        let response = SimpleHttpResponse::new(raw(200, ""));
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.reason_phrase(), Some("OK"));
        assert!(response.is_success_status_code());
    }

    #[test]
    fn test_unknown_status_has_no_reason() {
        let response = SimpleHttpResponse::new(raw(599, ""));
        assert_eq!(response.reason_phrase(), None);
        assert!(!response.is_success_status_code());
    }

    #[test]
    fn test_ensure_success_on_not_found() {
        let result = SimpleHttpResponse::new(raw(404, "")).ensure_success_status_code();
        assert_matches!(
            result,
            Err(Error::UnsuccessfulResponse { status, reason: Some(reason) })
                if status == StatusCode::NOT_FOUND && reason == "Not Found"
        );
    }

    #[test]
    fn test_ensure_success_returns_wrapper() {
        let response = SimpleHttpResponse::new(raw(204, ""))
            .ensure_success_status_code()
            .unwrap();
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_header_accessors() {
        let response = SimpleHttpResponse::new(raw(200, ""));
        assert_eq!(response.get_header_value("X-Test").as_deref(), Some("value1"));
        assert_eq!(
            response.get_header_values("x-test").unwrap(),
            vec!["value1", "value2"]
        );
        assert_eq!(
            response.try_get_header_values("x-test").unwrap(),
            vec!["value1", "value2"]
        );
    }

    #[test]
    fn test_missing_header_conventions() {
        let response = SimpleHttpResponse::new(raw(200, ""));
        assert_eq!(response.get_header_value("notpresent"), None);
        assert_eq!(response.try_get_header_values("notpresent"), None);
        assert_matches!(
            response.get_header_values("notpresent"),
            Err(Error::HeaderNotFound(name)) if name == "notpresent"
        );
    }

    #[test]
    fn test_borrowed_metadata_wrapper() {
        let owned = raw(201, "");
        let a = SimpleHttpResponse::new(&owned);
        let b = SimpleHttpResponse::new(&owned);
        assert_eq!(a.status_code(), b.status_code());
        assert_eq!(owned.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_deserialize_json_content() {
        let mut response =
            SimpleHttpResponse::new(raw(200, r#"{"FirstName":"John","LastName":"Smith"}"#));
        let person: Person = response.deserialize_json_content().await.unwrap();
        assert_eq!(person.first_name, "John");
        assert_eq!(person.last_name, "Smith");
        assert!(response.is_body_consumed());
    }

    #[tokio::test]
    async fn test_second_read_reports_consumed() {
        let mut response = SimpleHttpResponse::new(raw(200, "[1,2,3]"));
        let first: Vec<u32> = response.deserialize_json_content().await.unwrap();
        assert_eq!(first, vec![1, 2, 3]);

        let second = response.deserialize_json_content::<Vec<u32>>().await;
        assert_matches!(second, Err(Error::BodyConsumed));
    }

    #[tokio::test]
    async fn test_invalid_json_reports_serialization_failure() {
        let mut response = SimpleHttpResponse::new(raw(200, "not json"));
        let result = response.deserialize_json_content::<Person>().await;
        assert_matches!(result, Err(Error::SerializationFailed(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_reports_serialization_failure() {
        let mut response = SimpleHttpResponse::new(raw(200, r#"{"FirstName":"John"}"#));
        let result = response.deserialize_json_content::<Person>().await;
        assert_matches!(result, Err(Error::SerializationFailed(_)));
    }

    #[tokio::test]
    async fn test_cancelled_read() {
        let token = CancellationToken::new();
        token.cancel();

        let mut response = SimpleHttpResponse::new(raw(200, "{}"));
        let result = response
            .deserialize_json_content_opts::<serde_json::Value>(
                &DeserializeOptions::default(),
                Some(&token),
            )
            .await;
        assert_matches!(result, Err(Error::Cancelled));
        assert!(response.is_body_consumed());
    }

    #[tokio::test]
    async fn test_uncancelled_token_reads_normally() {
        let token = CancellationToken::new();
        let mut response = SimpleHttpResponse::new(raw(200, r#"{"ok":true}"#));
        let value: serde_json::Value = response
            .deserialize_json_content_opts(&DeserializeOptions::default(), Some(&token))
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let mut response = SimpleHttpResponse::new(raw(200, r#"{"key":"a long value"}"#));
        let options = DeserializeOptions::default().with_max_body_size(8);
        let result = response
            .deserialize_json_content_opts::<serde_json::Value>(&options, None)
            .await;
        assert_matches!(result, Err(Error::BodyTooLarge { limit: 8 }));
    }

    #[tokio::test]
    async fn test_mut_borrow_keeps_ownership_with_caller() {
        let mut owned = raw(200, "42");
        let value: u32 = SimpleHttpResponse::new(&mut owned)
            .deserialize_json_content()
            .await
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(owned.status(), StatusCode::OK);
    }

    #[test]
    fn test_into_raw_response_round_trips_ownership() {
        let response: SimpleHttpResponse = raw(202, "").into();
        let inner = response.into_raw_response();
        assert_eq!(inner.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_non_ascii_header_values_are_kept() {
        let response: reqwest::Response = http::Response::builder()
            .header("x-name", HeaderValue::from_bytes("café".as_bytes()).unwrap())
            .header("x-name", "plain")
            .header("x-name", HeaderValue::from_bytes(b"caf\xe9").unwrap())
            .body("")
            .unwrap()
            .into();
        let response = SimpleHttpResponse::new(response);

        assert_eq!(response.get_header_value("x-name").as_deref(), Some("café"));
        assert_eq!(
            response.get_header_values("x-name").unwrap(),
            vec!["café", "plain", "caf\u{FFFD}"]
        );
        assert_eq!(response.try_get_header_values("x-name").unwrap().len(), 3);
    }

    #[test]
    fn test_server_reason_phrase_is_preferred() {
        let response: reqwest::Response = http::Response::builder()
            .status(418)
            .extension(ReasonPhrase::from_static(b"Out Of Tea"))
            .body("")
            .unwrap()
            .into();
        let response = SimpleHttpResponse::new(response);
        assert_eq!(response.reason_phrase(), Some("Out Of Tea"));

        assert_matches!(
            response.ensure_success_status_code(),
            Err(Error::UnsuccessfulResponse { reason: Some(reason), .. }) if reason == "Out Of Tea"
        );
    }

    #[tokio::test]
    async fn test_rewrapped_response_reports_consumed() {
        let mut owned = raw(200, r#"{"a":1}"#);

        let first: serde_json::Value = SimpleHttpResponse::new(&mut owned)
            .deserialize_json_content()
            .await
            .unwrap();
        assert_eq!(first["a"], 1);

        let mut again = SimpleHttpResponse::new(&mut owned);
        assert!(again.is_body_consumed());
        assert_matches!(
            again.deserialize_json_content::<serde_json::Value>().await,
            Err(Error::BodyConsumed)
        );
        assert!(SimpleHttpResponse::new(&owned).is_body_consumed());
    }

    #[tokio::test]
    async fn test_recovered_response_stays_consumed() {
        let mut response = SimpleHttpResponse::new(raw(200, "[]"));
        let _: Vec<u32> = response.deserialize_json_content().await.unwrap();

        let mut rewrapped = SimpleHttpResponse::new(response.into_raw_response());
        assert_matches!(
            rewrapped.deserialize_json_content::<Vec<u32>>().await,
            Err(Error::BodyConsumed)
        );
    }
}
