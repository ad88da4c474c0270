//! Retry budget for transient statuses

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry budget applied inside each request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(
        with = "crate::domains::utils::serde_duration_ms",
        default = "default_delay"
    )]
    pub delay: Duration,

    /// Statuses that trigger a retry instead of failing the run
    #[serde(default = "default_transient_statuses")]
    pub transient_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: default_delay(),
            transient_statuses: default_transient_statuses(),
        }
    }
}

impl Validatable for RetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        for status in &self.transient_statuses {
            if !(100..=599).contains(status) {
                return Err(self.validation_error(format!(
                    "transient status {} is not a valid HTTP status code",
                    status
                )));
            }
            if (200..=299).contains(status) {
                return Err(self.validation_error(format!(
                    "transient status {} is a success status",
                    status
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "retry"
    }
}

// Default value functions
fn default_max_retries() -> u32 {
    10
}

fn default_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_transient_statuses() -> Vec<u16> {
    vec![404, 503]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 10);
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!(config.transient_statuses, vec![404, 503]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_rejects_bad_statuses() {
        let mut config = RetryConfig::default();
        config.transient_statuses = vec![503, 200];
        assert!(config.validate().is_err());

        config.transient_statuses = vec![42];
        assert!(config.validate().is_err());

        config.transient_statuses = vec![];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delay_is_milliseconds_in_yaml() {
        let config: RetryConfig = serde_yaml::from_str("delay: 250\n").unwrap();
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.max_retries, 10);
    }
}
