//! Error types for a verification run

use thiserror::Error;

/// Why a single request failed to produce an observation.
///
/// Every variant is fatal to the run. Transient statuses that recover within
/// the retry budget never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Every attempt returned a transient status
    #[error("retry budget exhausted after {attempts} attempts, last status {last_status}")]
    ExhaustedRetry { attempts: u32, last_status: u16 },

    /// The service answered but the identity token could not be extracted
    #[error("malformed response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    /// A status that is neither successful nor transient
    #[error("unexpected status {status} on attempt {attempts}")]
    UnexpectedStatus { status: u16, attempts: u32 },

    /// Connection refused, DNS failure, client timeout and the like
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProbeError {
    /// Short, stable label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::ExhaustedRetry { .. } => "exhausted_retry",
            ProbeError::MalformedResponse { .. } => "malformed_response",
            ProbeError::UnexpectedStatus { .. } => "unexpected_status",
            ProbeError::Transport(_) => "transport",
        }
    }

    /// True when the service was reachable but its payload was not understood
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProbeError::MalformedResponse { .. })
    }
}

/// Errors raised by an environment collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("environment setup failed: {0}")]
    Setup(String),

    #[error("environment teardown failed: {0}")]
    Teardown(String),
}

/// Fatal errors that abort a verification run.
///
/// A distribution that falls outside tolerance is not an error; it is a
/// completed run whose verification did not pass.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("request {iteration} failed: {source}")]
    Probe {
        iteration: u64,
        #[source]
        source: ProbeError,
    },

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("invalid run options: {0}")]
    InvalidOptions(String),
}

impl RunError {
    /// The underlying request failure, if this run died on one
    pub fn probe_error(&self) -> Option<&ProbeError> {
        match self {
            RunError::Probe { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_and_malformed_are_distinguishable() {
        let exhausted = ProbeError::ExhaustedRetry {
            attempts: 11,
            last_status: 503,
        };
        let malformed = ProbeError::MalformedResponse {
            status: 200,
            reason: "no identity token".to_string(),
        };

        assert_eq!(exhausted.kind(), "exhausted_retry");
        assert_eq!(malformed.kind(), "malformed_response");
        assert!(!exhausted.is_malformed());
        assert!(malformed.is_malformed());
    }

    #[test]
    fn test_run_error_carries_iteration() {
        let err = RunError::Probe {
            iteration: 42,
            source: ProbeError::Transport("connection refused".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "request 42 failed: transport error: connection refused"
        );
        assert_eq!(err.probe_error().map(ProbeError::kind), Some("transport"));
    }
}
