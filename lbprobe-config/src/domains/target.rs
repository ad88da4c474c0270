//! Endpoint under test

use crate::error::ConfigResult;
use crate::validation::{validate_http_url, validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Endpoint under test and the expected shape of the split
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// URL requests are sent to (scheme, host, port, path)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Host` header, selecting the routing rule
    #[serde(default = "default_host")]
    pub host: String,

    /// Requests sent per run
    #[serde(default = "default_total_requests")]
    pub total_requests: u64,

    /// Replicas expected to share the traffic
    #[serde(default = "default_expected_replicas")]
    pub expected_replicas: usize,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            host: default_host(),
            total_requests: default_total_requests(),
            expected_replicas: default_expected_replicas(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.base_url, "base_url", self.domain_name())?;
        validate_required_string(&self.host, "host", self.domain_name())?;
        validate_positive(self.total_requests, "total_requests", self.domain_name())?;
        validate_positive(self.expected_replicas, "expected_replicas", self.domain_name())?;

        if self.total_requests < self.expected_replicas as u64 {
            return Err(self.validation_error(format!(
                "total_requests ({}) must be at least expected_replicas ({})",
                self.total_requests, self.expected_replicas
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1/".to_string()
}

fn default_host() -> String {
    "load-balance.com".to_string()
}

fn default_total_requests() -> u64 {
    600
}

fn default_expected_replicas() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults() {
        let config = TargetConfig::default();
        assert_eq!(config.total_requests, 600);
        assert_eq!(config.expected_replicas, 3);
        assert_eq!(config.host, "load-balance.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_validation() {
        let mut config = TargetConfig::default();
        config.expected_replicas = 0;
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.total_requests = 2;
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.host = " ".to_string();
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.base_url = "127.0.0.1:8080".to_string();
        assert!(config.validate().is_err());
    }
}
