//! Lifetime counters for a request manager.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for the pending request table.
///
/// Every created request ends up in exactly one of the terminal counters
/// once it has been resolved.
#[derive(Debug, Default)]
pub struct RequestStats {
    /// Total requests created
    pub created: AtomicU64,
    /// Requests resolved with a reply payload
    pub fulfilled: AtomicU64,
    /// Requests resolved with a remote error (including `fail_all`)
    pub failed: AtomicU64,
    /// Requests claimed by their own timeout
    pub timed_out: AtomicU64,
    /// Requests claimed by caller cancellation or deadline
    pub canceled: AtomicU64,
    /// Handles dropped without awaiting, or whose send failed
    pub abandoned: AtomicU64,
    /// `fulfill`/`fail` calls that matched no pending request
    pub unmatched: AtomicU64,
}

/// Point-in-time copy of [`RequestStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub created: u64,
    pub fulfilled: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub canceled: u64,
    pub abandoned: u64,
    pub unmatched: u64,
}

impl StatsSnapshot {
    /// Requests that reached a terminal state.
    pub fn resolved(&self) -> u64 {
        self.fulfilled + self.failed + self.timed_out + self.canceled + self.abandoned
    }
}

impl RequestStats {
    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            created: self.created.load(Ordering::Relaxed),
            fulfilled: self.fulfilled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            canceled: self.canceled.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
        }
    }
}
