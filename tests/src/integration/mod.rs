//! Cross-crate integration tests.

pub mod transport_flows;
