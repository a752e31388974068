//! Pending request table.
//!
//! A single `RwLock` guards the whole map. Inserts and claims take the write
//! lock; advisory queries take the read lock. A claim removes the entry and,
//! when the claimer carries an outcome, writes it into the request's slot
//! before the lock is released. Anyone who later fails to claim the same
//! identifier can therefore read the slot without waiting.

use crate::id::RequestId;
use crate::Outcome;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// A request waiting for its outcome.
pub(crate) struct PendingEntry {
    /// Single-slot outcome channel; sending never blocks
    slot: oneshot::Sender<Outcome>,
    /// When the request was created
    created_at: Instant,
    /// Configured timeout (informational once inserted)
    timeout: Duration,
}

impl PendingEntry {
    pub(crate) fn new(slot: oneshot::Sender<Outcome>, timeout: Duration) -> Self {
        Self {
            slot,
            created_at: Instant::now(),
            timeout,
        }
    }
}

/// Result of delivering an outcome to a claimed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// The outcome sits in the slot.
    Delivered { age: Duration, timeout: Duration },
    /// The entry was claimed but its receiver was already gone.
    ReceiverGone,
    /// No entry for the identifier.
    NotPending,
}

#[derive(Default)]
pub(crate) struct PendingTable {
    entries: RwLock<HashMap<RequestId, PendingEntry>>,
}

impl PendingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a new entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already pending. That means the allocator handed out
    /// a colliding identifier, and overwriting would orphan the first waiter.
    pub(crate) fn insert(&self, id: RequestId, entry: PendingEntry) {
        let mut entries = self.entries.write();
        if entries.contains_key(&id) {
            panic!("request identifier {id} allocated while still pending");
        }
        entries.insert(id, entry);
    }

    /// Claim `id` and deposit `outcome` into its slot.
    ///
    /// `resolved` is bumped before the outcome becomes visible to the caller
    /// and rolled back if nobody is left to receive it.
    pub(crate) fn deliver(
        &self,
        id: RequestId,
        outcome: Outcome,
        resolved: &AtomicU64,
    ) -> Delivery {
        let mut entries = self.entries.write();
        let Some(entry) = entries.remove(&id) else {
            return Delivery::NotPending;
        };
        resolved.fetch_add(1, Ordering::Relaxed);
        // Send while still holding the lock so a losing claimer always finds
        // the slot filled.
        let age = entry.created_at.elapsed();
        match entry.slot.send(outcome) {
            Ok(()) => Delivery::Delivered {
                age,
                timeout: entry.timeout,
            },
            Err(_) => {
                resolved.fetch_sub(1, Ordering::Relaxed);
                Delivery::ReceiverGone
            }
        }
    }

    /// Claim `id` without writing an outcome (timeout, cancellation, drop).
    ///
    /// Returns `false` if someone else already claimed it.
    pub(crate) fn claim(&self, id: RequestId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    /// Claim every pending entry, depositing a fresh outcome into each slot.
    ///
    /// Returns the number of slots that received the outcome.
    pub(crate) fn deliver_all(
        &self,
        mut outcome: impl FnMut() -> Outcome,
        resolved: &AtomicU64,
    ) -> usize {
        let mut entries = self.entries.write();
        let mut delivered = 0;
        for (_, entry) in entries.drain() {
            resolved.fetch_add(1, Ordering::Relaxed);
            if entry.slot.send(outcome()).is_ok() {
                delivered += 1;
            } else {
                resolved.fetch_sub(1, Ordering::Relaxed);
            }
        }
        delivered
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn contains(&self, id: RequestId) -> bool {
        self.entries.read().contains_key(&id)
    }
}
