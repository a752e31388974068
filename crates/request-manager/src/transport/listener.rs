use super::{FrameReceiver, InboundFrame};
use crate::error::{RemoteError, TransportError};
use crate::manager::RequestManager;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Consecutive receive failures after which the connection is treated as lost.
pub const MAX_CONSECUTIVE_RECEIVE_FAILURES: u32 = 8;

/// Delay after the first receive failure; doubles on each further failure.
const RECEIVE_RETRY_BASE: Duration = Duration::from_millis(10);

/// Upper bound for the retry delay.
const RECEIVE_RETRY_MAX: Duration = Duration::from_secs(1);

/// Inbound dispatcher: routes every reply or error frame to the manager.
pub struct ReplyListener {
    manager: RequestManager,
    receiver: Arc<dyn FrameReceiver>,
}

impl ReplyListener {
    pub fn new(manager: RequestManager, receiver: Arc<dyn FrameReceiver>) -> Self {
        Self { manager, receiver }
    }

    /// Run the listener loop until the connection closes.
    ///
    /// Receive errors are retried with exponential backoff. After
    /// [`MAX_CONSECUTIVE_RECEIVE_FAILURES`] in a row the connection counts as
    /// closed. On close, every request still pending is failed with a
    /// transport error so no caller waits for its full timeout on a dead
    /// connection.
    pub async fn run(self) {
        let mut failures = 0u32;
        loop {
            match self.receiver.receive().await {
                Ok(frame) => {
                    failures = 0;
                    self.dispatch(frame);
                }
                Err(TransportError::Closed) => {
                    warn!("Frame receiver closed, stopping reply listener");
                    self.shutdown("connection closed");
                    break;
                }
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_RECEIVE_FAILURES {
                        error!(
                            error = %e,
                            failures,
                            "Frame receiver keeps failing, stopping reply listener"
                        );
                        self.shutdown("receiver failed repeatedly");
                        break;
                    }
                    let delay = retry_delay(failures);
                    error!(
                        error = %e,
                        failures,
                        retry_in_ms = delay.as_millis() as u64,
                        "Error receiving inbound frame"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn shutdown(&self, reason: &str) {
        let failed = self.manager.fail_all(RemoteError::transport(reason));
        debug!(failed, "Failed requests left pending at shutdown");
    }

    /// Route a single frame. Returns whether it matched a pending request.
    pub fn dispatch(&self, frame: InboundFrame) -> bool {
        let id = frame.id();
        let matched = match frame {
            InboundFrame::Reply { id, payload } => self.manager.fulfill(id, payload),
            InboundFrame::Error { id, error } => self.manager.fail(id, error),
        };

        if !matched {
            debug!(request_id = %id, "Inbound frame matched no pending request");
        }
        matched
    }
}

fn retry_delay(failures: u32) -> Duration {
    let shift = failures.saturating_sub(1).min(16);
    RECEIVE_RETRY_BASE
        .saturating_mul(1 << shift)
        .min(RECEIVE_RETRY_MAX)
}
