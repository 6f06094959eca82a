//! Common test utilities for vsynx-session
//!
//! This module provides shared test infrastructure including:
//! - Snapshot fixtures describing a realistic editor setup
//! - A scripted backend that records calls and injects failures and latency
//! - A mockall backend for call-count expectations
//! - Builders wiring controllers to a backend

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Yield to the runtime until `condition` holds
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
