//! # RPC Telemetry
//!
//! Structured logging bootstrap for Wire-RPC clients.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rpc_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let logger = init_logging(&TelemetryConfig::from_env()).expect("Failed to init logging");
//!     let _service = logger.root_span().entered();
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RPC_SERVICE_NAME` | `wire-rpc` | Service name attached to log lines |
//! | `RPC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `RPC_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging, StructuredLogger};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Log a request lifecycle event with the standard `request_id` field.
///
/// # Example
///
/// ```rust,ignore
/// rpc_telemetry::log_request_event!(debug, handle.id(), "Sent request frame", name = "login");
/// ```
#[macro_export]
macro_rules! log_request_event {
    ($level:ident, $request_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            request_id = %$request_id,
            $($($field)*,)?
            $msg
        )
    };
}
