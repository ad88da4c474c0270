//! HTTP error types

use lbprobe_core::RunError;

/// Errors raised while preparing the driver, before any request is sent
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid identity pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Anything that can stop [`run_in_environment`](crate::run_in_environment)
/// from producing a report
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Run(#[from] RunError),
}
