//! Request Manager - the facade callers and the transport share.
//!
//! Flow:
//! 1. Caller calls `create()` and gets a [`RequestHandle`] with a fresh [`RequestId`]
//! 2. Caller sends its request frame tagged with `handle.id().to_wire()`
//! 3. Caller awaits the handle
//! 4. The transport decodes the identifier of each inbound reply or error frame
//!    and calls `fulfill()` or `fail()`
//! 5. Whoever claims the table entry first decides the outcome

use crate::config::ManagerConfig;
use crate::error::{ConfigError, RemoteError};
use crate::handle::RequestHandle;
use crate::id::{RequestId, RequestIdAllocator};
use crate::payload::Payload;
use crate::stats::{RequestStats, StatsSnapshot};
use crate::table::{Delivery, PendingEntry, PendingTable};
use crate::Outcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Why a handle claimed its own entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    TimedOut,
    Canceled,
    Abandoned,
}

/// State shared between the manager and every handle it created.
pub(crate) struct Shared {
    allocator: RequestIdAllocator,
    table: PendingTable,
    stats: RequestStats,
    config: ManagerConfig,
}

impl Shared {
    /// Remove `id` from the table on behalf of its own handle.
    pub(crate) fn claim(&self, id: RequestId, reason: Claim) -> bool {
        if !self.table.claim(id) {
            return false;
        }
        let counter = match reason {
            Claim::TimedOut => &self.stats.timed_out,
            Claim::Canceled => &self.stats.canceled,
            Claim::Abandoned => &self.stats.abandoned,
        };
        RequestStats::record(counter);
        true
    }

    fn resolve(&self, id: RequestId, outcome: Outcome) -> bool {
        let success = outcome.is_ok();
        let counter = if success {
            &self.stats.fulfilled
        } else {
            &self.stats.failed
        };
        match self.table.deliver(id, outcome, counter) {
            Delivery::Delivered { age, timeout } => {
                debug!(
                    request_id = %id,
                    success,
                    elapsed_ms = age.as_millis() as u64,
                    timeout_ms = timeout.as_millis() as u64,
                    "Resolved pending request"
                );
                true
            }
            Delivery::ReceiverGone => {
                debug!(request_id = %id, "Pending request receiver dropped");
                false
            }
            Delivery::NotPending => {
                RequestStats::record(&self.stats.unmatched);
                if self.config.log_unmatched {
                    debug!(
                        request_id = %id,
                        success,
                        "Reply for unknown or already resolved request"
                    );
                }
                false
            }
        }
    }
}

/// Tracks outgoing requests and matches replies back to their callers.
///
/// Cloning is cheap; clones share the same identifier counter and table, so a
/// clone can be handed to the transport's inbound side.
#[derive(Clone)]
pub struct RequestManager {
    shared: Arc<Shared>,
}

impl RequestManager {
    /// Create a manager with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(ManagerConfig::default())
    }

    /// Create a manager with a custom configuration.
    pub fn with_config(config: ManagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ManagerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                allocator: RequestIdAllocator::new(),
                table: PendingTable::new(),
                stats: RequestStats::default(),
                config,
            }),
        }
    }

    /// Register a new request.
    ///
    /// The timeout clock does not start here; it starts when the handle is
    /// awaited.
    pub fn create(&self, timeout: Duration) -> RequestHandle {
        let id = self.shared.allocator.next();
        let (tx, rx) = oneshot::channel();

        RequestStats::record(&self.shared.stats.created);
        self.shared.table.insert(id, PendingEntry::new(tx, timeout));

        debug!(
            request_id = %id,
            timeout_ms = timeout.as_millis() as u64,
            "Registered pending request"
        );

        RequestHandle::new(id, timeout, rx, Arc::clone(&self.shared))
    }

    /// Register a new request using the configured default timeout.
    pub fn create_default(&self) -> RequestHandle {
        self.create(self.shared.config.default_timeout)
    }

    /// Resolve a pending request with a reply payload.
    ///
    /// Returns `false` if no request with this identifier is pending. That is
    /// expected for late or duplicate replies and is not an error.
    pub fn fulfill(&self, id: RequestId, payload: Payload) -> bool {
        self.shared.resolve(id, Ok(payload))
    }

    /// Resolve a pending request with an error. Same contract as [`fulfill`](Self::fulfill).
    pub fn fail(&self, id: RequestId, error: RemoteError) -> bool {
        self.shared.resolve(id, Err(error.into()))
    }

    /// Fail every pending request, typically because the connection was lost.
    ///
    /// Returns the number of waiting callers that received the error.
    pub fn fail_all(&self, error: RemoteError) -> usize {
        let failed = self
            .shared
            .table
            .deliver_all(|| Err(error.clone().into()), &self.shared.stats.failed);

        if failed > 0 {
            warn!(failed, error = %error, "Failed all pending requests");
        }
        failed
    }

    /// Number of currently pending requests. Advisory; may be stale on return.
    pub fn pending_count(&self) -> usize {
        self.shared.table.len()
    }

    /// Whether `id` is currently pending. Advisory; may be stale on return.
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.shared.table.contains(id)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.shared.config
    }
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}
