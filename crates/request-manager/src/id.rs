//! Correlation identifiers and their allocator.
//!
//! Identifiers are plain 64-bit counter values. On the wire they travel as an
//! 8-byte little-endian field in both the outgoing request frame and the
//! matching reply or error frame.

use crate::error::WireError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Width of the correlation identifier field in a frame.
pub const REQUEST_ID_LEN: usize = 8;

/// Correlation identifier tying a reply frame back to its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw counter value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw counter value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Encode for the wire (little-endian).
    pub const fn to_wire(&self) -> [u8; REQUEST_ID_LEN] {
        self.0.to_le_bytes()
    }

    /// Decode from a fixed-size wire field.
    pub const fn from_wire(bytes: [u8; REQUEST_ID_LEN]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// Decode from an arbitrary slice taken out of an inbound frame.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidIdLength`] unless the slice is exactly
    /// [`REQUEST_ID_LEN`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, WireError> {
        let field: [u8; REQUEST_ID_LEN] =
            bytes.try_into().map_err(|_| WireError::InvalidIdLength {
                expected: REQUEST_ID_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self::from_wire(field))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RequestId> for u64 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Monotonic identifier source, one per [`RequestManager`](crate::RequestManager).
///
/// The counter is an atomic of its own and never touches the pending table
/// lock, so allocating identifiers does not contend with reply traffic.
#[derive(Debug, Default)]
pub struct RequestIdAllocator {
    last: AtomicU64,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier. The first call returns `1`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> RequestId {
        // fetch_add wraps on overflow; 2^64 allocations is out of scope.
        let previous = self.last.fetch_add(1, Ordering::Relaxed);
        RequestId(previous.wrapping_add(1))
    }

    /// Most recently allocated identifier, `None` before the first allocation.
    pub fn last(&self) -> Option<RequestId> {
        match self.last.load(Ordering::Relaxed) {
            0 => None,
            value => Some(RequestId(value)),
        }
    }
}
