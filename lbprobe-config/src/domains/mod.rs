//! Domain-specific configuration modules

pub mod environment;
pub mod http;
pub mod identity;
pub mod logging;
pub mod retry;
pub mod run;
pub mod target;
pub mod tolerance;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main lbprobe configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LbProbeConfig {
    /// Endpoint under test and the expected shape of the split
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Retry budget for transient statuses
    #[serde(default)]
    pub retry: retry::RetryConfig,

    /// Acceptable per-replica counts
    #[serde(default)]
    pub tolerance: tolerance::ToleranceConfig,

    /// How replica identity is extracted from response bodies
    #[serde(default)]
    pub identity: identity::IdentityConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Run shape
    #[serde(default)]
    pub run: run::RunConfig,

    /// Setup/teardown hooks
    #[serde(default)]
    pub environment: environment::EnvironmentConfig,
}

impl LbProbeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.retry.validate()?;
        self.tolerance.validate()?;
        self.tolerance.validate_for_target(&self.target)?;
        self.identity.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.run.validate()?;
        self.environment.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = LbProbeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
