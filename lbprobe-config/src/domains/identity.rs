//! Replica identity extraction configuration

use crate::error::ConfigResult;
use crate::validation::{validate_regex, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// How the serving replica is recognised in a response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Service-name prefix every replica identity starts with
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Full regular expression; overrides `prefix`. When it has a capture
    /// group, the first group is the identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            pattern: None,
        }
    }
}

impl Validatable for IdentityConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.pattern {
            Some(ref pattern) => validate_regex(pattern, "pattern", self.domain_name()),
            None => validate_required_string(&self.prefix, "prefix", self.domain_name()),
        }
    }

    fn domain_name(&self) -> &'static str {
        "identity"
    }
}

fn default_prefix() -> String {
    "http-svc".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_defaults() {
        let config = IdentityConfig::default();
        assert_eq!(config.prefix, "http-svc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_identity_validation() {
        let mut config = IdentityConfig::default();
        config.prefix = String::new();
        assert!(config.validate().is_err());

        // A pattern makes the prefix irrelevant
        config.pattern = Some(r"Hostname: (\S+)".to_string());
        assert!(config.validate().is_ok());

        config.pattern = Some("(unclosed".to_string());
        assert!(config.validate().is_err());
    }
}
