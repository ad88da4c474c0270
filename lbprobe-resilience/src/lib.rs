//! Resilience patterns for lbprobe
//!
//! This crate provides the bounded retry policy used by the request driver:
//! a policy value (attempt budget and fixed delay) and an executor that
//! applies it to any fallible async operation whose error knows whether it
//! is worth retrying.

pub mod retry;

// Re-export commonly used types
pub use retry::{RetryError, RetryExecutor, RetryPolicy, Retryable};
