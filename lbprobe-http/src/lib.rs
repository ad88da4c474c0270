//! HTTP request driver for lbprobe
//!
//! [`HttpProbe`] sends one GET to the routable host, retries transient
//! statuses under a bounded [`RetryPolicy`](lbprobe_resilience::RetryPolicy)
//! and turns the response body into an [`Observation`](lbprobe_core::Observation).
//! The [`harness`] module wires a probe, run options and an environment
//! together from an [`LbProbeConfig`](lbprobe_config::LbProbeConfig).

pub mod config;
pub mod errors;
pub mod harness;
pub mod identity;
pub mod probe;

pub use config::{build_client, HttpConfig};
pub use errors::{HarnessError, HttpError};
pub use harness::{retry_policy_from_config, run_in_environment, run_options_from_config};
pub use identity::IdentityExtractor;
pub use probe::HttpProbe;
