//! Request helper combining a manager with a frame sender.

use crate::error::RequestError;
use crate::manager::RequestManager;
use crate::payload::Payload;
use crate::transport::{FrameSender, OutboundFrame};
use crate::Outcome;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Issues requests over a [`FrameSender`] and waits for their correlated replies.
///
/// Replies are routed back by a [`ReplyListener`](crate::transport::ReplyListener)
/// sharing the same manager.
#[derive(Clone)]
pub struct RpcClient {
    manager: RequestManager,
    sender: Arc<dyn FrameSender>,
}

impl RpcClient {
    pub fn new(manager: RequestManager, sender: Arc<dyn FrameSender>) -> Self {
        Self { manager, sender }
    }

    pub fn manager(&self) -> &RequestManager {
        &self.manager
    }

    /// Send a request and wait for its outcome.
    ///
    /// `timeout` falls back to the manager's default. If the frame cannot be
    /// sent the request is withdrawn and [`RequestError::Send`] is returned.
    pub async fn request<C>(
        &self,
        name: Option<&str>,
        payload: Payload,
        timeout: Option<Duration>,
        cancel: C,
    ) -> Outcome
    where
        C: Future<Output = ()>,
    {
        let handle = match timeout {
            Some(timeout) => self.manager.create(timeout),
            None => self.manager.create_default(),
        };
        let id = handle.id();

        let frame = OutboundFrame::new(id, name.map(str::to_owned), payload);
        if let Err(e) = self.sender.send(frame).await {
            // Dropping the handle withdraws the request from the table.
            drop(handle);
            return Err(RequestError::Send(e));
        }

        debug!(request_id = %id, name = name.unwrap_or(""), "Sent request frame");

        handle.await_outcome(cancel).await
    }

    /// Send a named request with the default timeout and no cancellation.
    pub async fn query(&self, name: &str, payload: Payload) -> Outcome {
        self.request(Some(name), payload, None, std::future::pending())
            .await
    }
}
