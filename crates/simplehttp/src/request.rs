//! HTTP request builder

use crate::body::Body;
use crate::error::{Error, Result};
use crate::json::SerializeOptions;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;

/// A built request, ready to hand to a transport.
pub type Request = http::Request<Body>;

/// Media type set by [`RequestBuilder::with_json_body`].
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Scheme used by [`RequestBuilder::with_bearer_token`].
pub const BEARER_PREFIX: &str = "Bearer";

/// Builder for HTTP requests.
///
/// Single-valued fields (method, URI, authorization, body) keep the last value
/// set. Headers accumulate: adding a name twice keeps both values in call
/// order.
///
/// [`build`](Self::build) takes a snapshot, so it can be called any number of
/// times and later builder calls never affect a request that was already built.
///
/// Fallible methods validate all of their input before changing anything.
///
/// ```
/// use simplehttp::{Method, RequestBuilder};
///
/// # fn main() -> simplehttp::Result<()> {
/// let request = RequestBuilder::parse(Method::POST, "https://example.com")?
///     .with_bearer_token("tok")?
///     .with_header("x-test", "a")?
///     .with_header("x-test", "b")?
///     .build();
///
/// assert_eq!(request.method(), Method::POST);
/// assert_eq!(request.headers()["authorization"], "Bearer tok");
/// assert_eq!(request.headers().get_all("x-test").iter().count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    authorization: Option<HeaderValue>,
    body: Body,
    content_type: Option<HeaderValue>,
}

impl RequestBuilder {
    /// Create an empty builder (`GET /`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a method and an already parsed URI.
    pub fn from_parts(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            ..Self::default()
        }
    }

    /// Create a builder from a method and a URI string.
    ///
    /// # Errors
    /// Returns [`Error::InvalidUri`] if `uri` does not parse.
    pub fn parse(method: Method, uri: &str) -> Result<Self> {
        Ok(Self::from_parts(method, parse_uri(uri)?))
    }

    /// Set the HTTP method.
    ///
    /// Extension verbs are built with [`Method::from_bytes`].
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the request URI.
    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Parse and set the request URI.
    ///
    /// # Errors
    /// Returns [`Error::InvalidUri`] if `uri` does not parse. The builder is
    /// not changed in that case.
    pub fn with_uri_str(mut self, uri: &str) -> Result<Self> {
        self.uri = parse_uri(uri)?;
        Ok(self)
    }

    /// Set a `Bearer` authorization, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the token cannot appear in a header.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Result<Self> {
        self.with_authorization(BEARER_PREFIX, token)
    }

    /// Set the authorization to `"{prefix} {token}"`, replacing any previous one.
    ///
    /// The value is marked sensitive so it is redacted from `Debug` output.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the composed value cannot appear in a
    /// header.
    pub fn with_authorization(
        mut self,
        prefix: impl AsRef<str>,
        token: impl AsRef<str>,
    ) -> Result<Self> {
        let raw = format!("{} {}", prefix.as_ref(), token.as_ref());
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|e| Error::invalid_header(AUTHORIZATION.as_str(), e))?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    /// Append a header value. Existing values for `name` are kept.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the name or value is invalid.
    pub fn with_header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.with_header_values(name, [value])
    }

    /// Append several values under one header name, in order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] if the name or any value is invalid.
    /// No value is added in that case.
    pub fn with_header_values<I, V>(mut self, name: impl AsRef<str>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let (name, values) = parse_header(name.as_ref(), values)?;
        for value in values {
            self.headers.append(name.clone(), value);
        }
        Ok(self)
    }

    /// Append one value per entry, in iteration order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] on the first invalid entry. No header
    /// is added in that case.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let parsed = headers
            .into_iter()
            .map(|(name, value)| parse_header(name.as_ref(), [value]))
            .collect::<Result<Vec<_>>>()?;
        for (name, values) in parsed {
            for value in values {
                self.headers.append(name.clone(), value);
            }
        }
        Ok(self)
    }

    /// Append every value of every entry, in iteration order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidHeader`] on the first invalid entry. No header
    /// is added in that case.
    pub fn with_multi_headers<I, K, VS, V>(mut self, headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, VS)>,
        K: AsRef<str>,
        VS: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let parsed = headers
            .into_iter()
            .map(|(name, values)| parse_header(name.as_ref(), values))
            .collect::<Result<Vec<_>>>()?;
        for (name, values) in parsed {
            for value in values {
                self.headers.append(name.clone(), value);
            }
        }
        Ok(self)
    }

    /// Serialize `value` as compact JSON and use it as the body.
    ///
    /// # Errors
    /// Returns [`Error::SerializationFailed`] if `value` cannot be serialized.
    pub fn with_json_body<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        self.with_json_body_opts(value, &SerializeOptions::default())
    }

    /// Serialize `value` with `options` and use it as the body.
    ///
    /// Sets `Content-Type: application/json; charset=utf-8` and replaces any
    /// previous body.
    ///
    /// # Errors
    /// Returns [`Error::SerializationFailed`] if `value` cannot be serialized.
    pub fn with_json_body_opts<T: Serialize + ?Sized>(
        mut self,
        value: &T,
        options: &SerializeOptions,
    ) -> Result<Self> {
        let bytes = options.to_vec(value)?;
        self.body = Body::from(bytes);
        self.content_type = Some(HeaderValue::from_static(JSON_CONTENT_TYPE));
        Ok(self)
    }

    /// Build a snapshot of the configured request.
    ///
    /// Authorization and body content type are written last, so they win over
    /// `Authorization` or `Content-Type` values added with
    /// [`with_header`](Self::with_header).
    pub fn build(&self) -> Request {
        let mut request = http::Request::new(self.body.clone());
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();

        let headers = request.headers_mut();
        headers.clone_from(&self.headers);
        if let Some(authorization) = &self.authorization {
            headers.insert(AUTHORIZATION, authorization.clone());
        }
        if let Some(content_type) = &self.content_type {
            headers.insert(CONTENT_TYPE, content_type.clone());
        }

        tracing::trace!(
            method = %self.method,
            uri = %self.uri,
            header_count = request.headers().len(),
            body_size = self.body.len(),
            "Built HTTP request"
        );
        request
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the headers added so far (authorization and content type excluded).
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the authorization value, if set.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    /// Get the body.
    pub fn body(&self) -> &Body {
        &self.body
    }
}

fn parse_uri(uri: &str) -> Result<Uri> {
    uri.parse::<Uri>().map_err(|source| Error::InvalidUri {
        input: uri.to_string(),
        source,
    })
}

fn parse_header<I, V>(name: &str, values: I) -> Result<(HeaderName, Vec<HeaderValue>)>
where
    I: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::invalid_header(name, e))?;
    let values = values
        .into_iter()
        .map(|v| HeaderValue::from_str(v.as_ref()).map_err(|e| Error::invalid_header(name, e)))
        .collect::<Result<Vec<_>>>()?;
    Ok((header_name, values))
}
