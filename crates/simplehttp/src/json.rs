//! JSON serialization options

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Options controlling how request bodies are serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Emit indented JSON instead of the compact form.
    pub pretty: bool,
}

impl SerializeOptions {
    /// Compact output, the same as `serde_json::to_string`.
    pub fn compact() -> Self {
        Self::default()
    }

    /// Indented output, the same as `serde_json::to_string_pretty`.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub(crate) fn to_vec<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

/// Options controlling how response bodies are read and deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// Upper bound on the number of body bytes read before giving up.
    ///
    /// `None` reads the whole body.
    pub max_body_size: Option<usize>,
}

impl DeserializeOptions {
    /// Limit the body to `limit` bytes.
    pub fn with_max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = Some(limit);
        self
    }

    pub(crate) fn parse<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
