//! Core domain model for lbprobe
//!
//! lbprobe verifies the observable effect of a load-balancing policy from the
//! outside: it sends a fixed number of requests to one routable host, records
//! which replica answered each of them, and checks that every replica's share
//! lies inside a tolerance band around a uniform split.
//!
//! This crate holds the parts that do not touch the network:
//!
//! - [`Observation`] and [`ReplicaCountTable`] - what was seen
//! - [`ToleranceBand`] and [`verify`] - whether what was seen is acceptable
//! - [`ObservationSource`] and [`run_verification`] - the single-pass run loop
//! - [`Environment`] and [`with_environment`] - scoped setup/teardown of the
//!   system under test

pub mod environment;
pub mod error;
pub mod observation;
pub mod runner;
pub mod table;
pub mod tolerance;
pub mod verify;

// Re-export commonly used types
pub use environment::{with_environment, Environment, StaticEnvironment, Target};
pub use error::{EnvironmentError, ProbeError, RunError};
pub use observation::{Observation, ObservationError};
pub use runner::{collect_observations, run_verification, ObservationSource, RunOptions, RunReport};
pub use table::ReplicaCountTable;
pub use tolerance::{ToleranceBand, DEFAULT_MARGIN};
pub use verify::{verify, verify_with_band, VerificationResult, Violation};
