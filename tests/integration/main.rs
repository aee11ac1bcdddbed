//! Integration tests for the probe service.
//!
//! These run the real listener on an ephemeral loopback port.
//! Run with: cargo test --test integration

mod api;
mod shutdown;
