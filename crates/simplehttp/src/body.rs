//! Request body payload

use bytes::Bytes;

/// Body of a built request.
///
/// Either empty or a byte payload. The matching media type travels in the
/// request's `Content-Type` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(Option<Bytes>);

impl Body {
    /// A request without a body.
    pub fn empty() -> Self {
        Self(None)
    }

    /// Returns true if no payload is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Payload bytes, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    /// Payload length in bytes (0 when empty).
    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, Bytes::len)
    }

    /// Payload as UTF-8 text, if present and valid.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Consume the body and return its payload.
    pub fn into_bytes(self) -> Option<Bytes> {
        self.0
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self(Some(bytes))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Some(Bytes::from(bytes)))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self(Some(Bytes::from(text)))
    }
}

impl From<Body> for reqwest::Body {
    fn from(body: Body) -> Self {
        match body.0 {
            Some(bytes) => reqwest::Body::from(bytes),
            None => reqwest::Body::from(Bytes::new()),
        }
    }
}
