//! # Request Manager - Request/Reply Correlation
//!
//! Tracks in-flight requests of an RPC client that talks over a single
//! multiplexed connection, and matches replies arriving in any order back to
//! the caller waiting for them.
//!
//! ## Architecture
//!
//! ```text
//!   caller                                       transport (inbound)
//!     │ create(timeout)                                 │
//!     ▼                                                 │ fulfill(id, payload)
//! ┌─────────────────────┐   insert / claim    ┌─────────┴────────────┐
//! │   RequestManager    │ ──────────────────▶ │    PendingTable      │
//! │  (RequestIdAllocator│                     │ RwLock<HashMap<id,   │
//! │   + table + stats)  │                     │   oneshot::Sender>>  │
//! └─────────┬───────────┘                     └─────────┬────────────┘
//!           │ RequestHandle                             │ outcome
//!           ▼                                           ▼
//!   await_outcome(cancel)  ◀──────── single-slot oneshot channel
//!   races: slot | cancel | timeout
//! ```
//!
//! ## Guarantees
//!
//! - **Exactly once:** of {fulfill, fail, timeout, cancellation}, only the
//!   first to remove the table entry decides the outcome
//! - **No spurious timeouts:** a timeout or cancellation that loses the claim
//!   returns the reply that won instead
//! - **No leaks:** awaiting or dropping a handle always removes its entry
//! - **Resolvers never block:** the outcome slot has capacity one

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod client;
pub mod config;
pub mod error;
pub mod handle;
pub mod id;
pub mod manager;
pub mod payload;
pub mod stats;
mod table;
pub mod transport;

// Re-export main types
pub use client::RpcClient;
pub use config::{ManagerConfig, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ConfigError, RemoteError, RequestError, TransportError, WireError};
pub use handle::RequestHandle;
pub use id::{RequestId, RequestIdAllocator, REQUEST_ID_LEN};
pub use manager::RequestManager;
pub use payload::{Payload, PayloadEncoding};
pub use stats::StatsSnapshot;
pub use transport::{FrameReceiver, FrameSender, InboundFrame, OutboundFrame, ReplyListener};

/// Terminal result of a request, written into its slot exactly once.
pub type Outcome = Result<Payload, RequestError>;
