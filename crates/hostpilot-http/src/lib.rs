//! Hostpilot HTTP - REST control-plane adapter
//!
//! Implements the `hostpilot-core` control-plane traits against the
//! hosting provider's management API with `reqwest`. The live end-to-end
//! test in `tests/live_build.rs` drives a real build through this client.

pub mod client;
pub mod wire;

// Re-export key types
pub use client::{ControlPlaneClient, HttpConfig};
