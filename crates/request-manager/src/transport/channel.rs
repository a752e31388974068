//! In-memory transport over `tokio::sync::mpsc`, for tests and local peers.

use super::{FrameReceiver, FrameSender, InboundFrame, OutboundFrame};
use crate::error::TransportError;
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

pub struct ChannelSender(mpsc::Sender<OutboundFrame>);

impl ChannelSender {
    pub fn new(tx: mpsc::Sender<OutboundFrame>) -> Self {
        Self(tx)
    }
}

#[async_trait]
impl FrameSender for ChannelSender {
    async fn send(&self, frame: OutboundFrame) -> Result<(), TransportError> {
        self.0.send(frame).await.map_err(|_| TransportError::Closed)
    }
}

pub struct ChannelReceiver(Mutex<mpsc::Receiver<InboundFrame>>);

impl ChannelReceiver {
    pub fn new(rx: mpsc::Receiver<InboundFrame>) -> Self {
        Self(Mutex::new(rx))
    }
}

#[async_trait]
impl FrameReceiver for ChannelReceiver {
    async fn receive(&self) -> Result<InboundFrame, TransportError> {
        let mut guard = self.0.lock().await;
        guard.recv().await.ok_or(TransportError::Closed)
    }
}

/// Create a bounded channel pair
pub fn create_test_channel<T>(buffer: usize) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(buffer)
}

/// Both ends of an in-memory connection.
///
/// The client uses `sender` and `receiver`; the simulated peer reads
/// `requests` and writes `replies`.
pub struct Loopback {
    pub sender: ChannelSender,
    pub receiver: ChannelReceiver,
    pub requests: mpsc::Receiver<OutboundFrame>,
    pub replies: mpsc::Sender<InboundFrame>,
}

pub fn loopback(buffer: usize) -> Loopback {
    let (req_tx, req_rx) = create_test_channel(buffer);
    let (resp_tx, resp_rx) = create_test_channel(buffer);
    Loopback {
        sender: ChannelSender::new(req_tx),
        receiver: ChannelReceiver::new(resp_rx),
        requests: req_rx,
        replies: resp_tx,
    }
}
