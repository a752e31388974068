//! # Wire-RPC Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── correlation_properties.rs  # Uniqueness, exactly-once, timeout, races, churn
//!     └── transport_flows.rs         # Client + listener over an in-memory connection
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rpc-tests
//!
//! # By category
//! cargo test -p rpc-tests integration::correlation_properties
//! cargo test -p rpc-tests integration::transport_flows
//!
//! # Benchmarks
//! cargo bench -p rpc-tests
//! ```

pub mod integration;
