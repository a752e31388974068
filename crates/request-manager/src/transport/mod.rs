//! Transport seam.
//!
//! The correlation core does not own a connection. A transport implements
//! [`FrameSender`] for outgoing requests and [`FrameReceiver`] for inbound
//! reply and error frames; [`ReplyListener`] pumps the latter into the
//! [`RequestManager`](crate::RequestManager).

pub mod channel;
mod listener;

pub use listener::{ReplyListener, MAX_CONSECUTIVE_RECEIVE_FAILURES};

use crate::error::{RemoteError, TransportError, WireError};
use crate::id::RequestId;
use crate::payload::Payload;
use async_trait::async_trait;

/// Outgoing request, tagged with the identifier of its handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub id: RequestId,
    /// Optional request name (method) understood by the peer
    pub name: Option<String>,
    pub payload: Payload,
}

impl OutboundFrame {
    pub fn new(id: RequestId, name: Option<String>, payload: Payload) -> Self {
        Self { id, name, payload }
    }
}

/// Inbound frame that resolves a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Reply { id: RequestId, payload: Payload },
    Error { id: RequestId, error: RemoteError },
}

impl InboundFrame {
    /// Build a reply frame from the raw 8-byte identifier field.
    pub fn reply_from_wire(id_field: &[u8], payload: Payload) -> Result<Self, WireError> {
        Ok(Self::Reply {
            id: RequestId::from_slice(id_field)?,
            payload,
        })
    }

    /// Build an error frame from the raw 8-byte identifier field.
    pub fn error_from_wire(id_field: &[u8], error: RemoteError) -> Result<Self, WireError> {
        Ok(Self::Error {
            id: RequestId::from_slice(id_field)?,
            error,
        })
    }

    pub fn id(&self) -> RequestId {
        match self {
            Self::Reply { id, .. } | Self::Error { id, .. } => *id,
        }
    }
}

/// Sends request frames over the connection.
#[async_trait]
pub trait FrameSender: Send + Sync {
    async fn send(&self, frame: OutboundFrame) -> Result<(), TransportError>;
}

/// Receives reply and error frames from the connection.
#[async_trait]
pub trait FrameReceiver: Send + Sync {
    /// Receive next frame (waits until one is available)
    async fn receive(&self) -> Result<InboundFrame, TransportError>;
}
