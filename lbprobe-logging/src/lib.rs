//! Tracing subscriber setup for lbprobe
//!
//! Library crates log through `tracing` (and, for config and retry, through
//! `log`, which the subscriber bridges). Only the binary calls into here.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
