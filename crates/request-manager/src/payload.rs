//! Reply payloads delivered to waiting callers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Encoding of the payload data as announced by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    #[default]
    Binary,
    Utf8,
    Utf16,
}

/// Opaque reply payload.
///
/// An empty reply is still a `Payload` (with no data), so callers never have to
/// distinguish "no payload" from "empty payload".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    pub encoding: PayloadEncoding,
    pub data: Bytes,
}

impl Payload {
    pub fn new(encoding: PayloadEncoding, data: impl Into<Bytes>) -> Self {
        Self {
            encoding,
            data: data.into(),
        }
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::new(PayloadEncoding::Binary, data)
    }

    pub fn utf8(text: impl Into<String>) -> Self {
        Self::new(PayloadEncoding::Utf8, Bytes::from(text.into()))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// View the data as text when it was sent as UTF-8.
    pub fn as_utf8(&self) -> Option<&str> {
        match self.encoding {
            PayloadEncoding::Utf8 => std::str::from_utf8(&self.data).ok(),
            _ => None,
        }
    }
}
