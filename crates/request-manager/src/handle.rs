//! Request Handle - the caller's side of a pending request.

use crate::error::RequestError;
use crate::id::RequestId;
use crate::manager::{Claim, Shared};
use crate::Outcome;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What woke the await loop.
enum Wake {
    Deposited(Result<Outcome, oneshot::error::RecvError>),
    Interrupted,
    TimedOut,
}

/// A request registered with a [`RequestManager`](crate::RequestManager).
///
/// Awaiting consumes the handle, so each request yields exactly one outcome.
/// Dropping a handle without awaiting it removes the request from the table.
pub struct RequestHandle {
    id: RequestId,
    timeout: Duration,
    slot: oneshot::Receiver<Outcome>,
    shared: Arc<Shared>,
    settled: bool,
}

impl RequestHandle {
    pub(crate) fn new(
        id: RequestId,
        timeout: Duration,
        slot: oneshot::Receiver<Outcome>,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            id,
            timeout,
            slot,
            shared,
            settled: false,
        }
    }

    /// Identifier to embed in the outgoing request frame.
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for the reply, the timeout, or `cancel`, whichever comes first.
    ///
    /// The timeout clock starts now, not when the request was created. If
    /// `cancel` completes or the timeout elapses but a reply already claimed
    /// the request, that reply is returned instead of
    /// [`RequestError::Canceled`] or [`RequestError::Timeout`].
    pub async fn await_outcome<C>(self, cancel: C) -> Outcome
    where
        C: Future<Output = ()>,
    {
        self.race(cancel, RequestError::Canceled).await
    }

    /// Wait for the reply or the timeout.
    pub async fn await_reply(self) -> Outcome {
        self.await_outcome(std::future::pending()).await
    }

    /// Wait for the reply, the timeout, or cancellation of `token`.
    pub async fn await_cancellable(self, token: &CancellationToken) -> Outcome {
        self.await_outcome(token.cancelled()).await
    }

    /// Wait for the reply, the timeout, or the caller's own `deadline`.
    ///
    /// Reaching the deadline first yields [`RequestError::DeadlineExceeded`].
    pub async fn await_until(self, deadline: Instant) -> Outcome {
        self.race(tokio::time::sleep_until(deadline), RequestError::DeadlineExceeded)
            .await
    }

    async fn race<C>(mut self, cancel: C, interrupted: RequestError) -> Outcome
    where
        C: Future<Output = ()>,
    {
        let timer = tokio::time::sleep(self.timeout);
        tokio::pin!(timer);
        tokio::pin!(cancel);

        // Biased towards the slot: a reply that is already there wins over a
        // timer or signal that fired in the same poll.
        let wake = tokio::select! {
            biased;
            deposited = &mut self.slot => Wake::Deposited(deposited),
            () = &mut cancel => Wake::Interrupted,
            () = &mut timer => Wake::TimedOut,
        };

        let outcome = match wake {
            Wake::Deposited(Ok(outcome)) => outcome,
            Wake::Deposited(Err(_)) => self.missing_outcome(),
            Wake::Interrupted => self.settle(Claim::Canceled, interrupted),
            Wake::TimedOut => self.settle(
                Claim::TimedOut,
                RequestError::Timeout {
                    after: self.timeout,
                },
            ),
        };
        self.settled = true;
        outcome
    }

    /// Try to claim our own entry; if a resolver got there first, its
    /// outcome is already in the slot.
    fn settle(&mut self, reason: Claim, error: RequestError) -> Outcome {
        if self.shared.claim(self.id, reason) {
            debug!(
                request_id = %self.id,
                reason = ?reason,
                "Pending request settled locally"
            );
            return Err(error);
        }

        match self.slot.try_recv() {
            Ok(outcome) => {
                debug!(
                    request_id = %self.id,
                    reason = ?reason,
                    "Lost claim to an inbound resolution, using delivered outcome"
                );
                outcome
            }
            Err(_) => self.missing_outcome(),
        }
    }

    /// A resolver removes the entry and fills the slot under one write lock,
    /// so an unclaimable entry with an empty slot means the table is corrupt.
    fn missing_outcome(&self) -> ! {
        panic!(
            "request {} was claimed by a resolver but no outcome was delivered",
            self.id
        )
    }
}

impl Drop for RequestHandle {
    fn drop(&mut self) {
        if !self.settled && self.shared.claim(self.id, Claim::Abandoned) {
            debug!(request_id = %self.id, "Dropped pending request without awaiting it");
        }
    }
}

impl std::fmt::Debug for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandle")
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
