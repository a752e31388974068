//! Error types for request correlation.
//!
//! Only [`RequestError`] ever reaches a waiting caller. Replies for unknown or
//! already resolved identifiers are not errors at all: `fulfill` and `fail`
//! simply return `false`.

use std::time::Duration;
use thiserror::Error;

/// Error supplied by the remote side (or the transport) through `fail`.
///
/// The correlation layer never inspects it; it is handed to the caller as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The peer answered with an error frame.
    #[error("request failed ({code}): {message}")]
    Request { code: String, message: String },

    /// The connection failed before a reply arrived.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }
}

/// Terminal failure of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No reply arrived within the request's timeout.
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    /// The caller's cancellation signal fired first.
    #[error("request canceled")]
    Canceled,

    /// The caller's own deadline passed first.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The remote side failed the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The request frame never left the client.
    #[error("failed to send request: {0}")]
    Send(#[source] TransportError),
}

impl RequestError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled | Self::DeadlineExceeded)
    }
}

/// Transport-level errors surfaced by [`FrameSender`](crate::transport::FrameSender)
/// and [`FrameReceiver`](crate::transport::FrameReceiver) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Malformed correlation field in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("invalid request identifier length: expected {expected} bytes, got {actual}")]
    InvalidIdLength { expected: usize, actual: usize },
}

/// Invalid manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },
}
