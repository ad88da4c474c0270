//! Setup and teardown hooks for the system under test

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Shell commands run around a verification run.
///
/// `setup` must only exit once replicas are deployed and routing has
/// converged. `teardown` runs whether or not the run passed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub teardown: Option<String>,
}

impl EnvironmentConfig {
    /// True when neither hook is configured
    pub fn is_static(&self) -> bool {
        self.setup.is_none() && self.teardown.is_none()
    }
}

impl Validatable for EnvironmentConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(ref setup) = self.setup {
            validate_required_string(setup, "setup", self.domain_name())?;
        }
        if let Some(ref teardown) = self.teardown {
            validate_required_string(teardown, "teardown", self.domain_name())?;
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_static() {
        let config = EnvironmentConfig::default();
        assert!(config.is_static());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_hook_rejected() {
        let config = EnvironmentConfig {
            setup: Some("kubectl apply -f replicas.yaml".to_string()),
            teardown: Some(" ".to_string()),
        };
        assert!(!config.is_static());
        assert!(config.validate().is_err());
    }
}
