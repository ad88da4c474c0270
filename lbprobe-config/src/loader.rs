//! Configuration loading and environment variable handling

use crate::domains::LbProbeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with the `LBPROBE` prefix
    pub fn new() -> Self {
        Self {
            prefix: "LBPROBE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<LbProbeConfig> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let mut config: LbProbeConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<LbProbeConfig> {
        let mut config = LbProbeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<LbProbeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut LbProbeConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target)?;
        self.apply_retry_overrides(&mut config.retry)?;
        self.apply_identity_overrides(&mut config.identity);

        if let Some(margin) = self.parse_env_var("TOLERANCE_MARGIN")? {
            config.tolerance.margin = margin;
        }

        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;

        if let Some(concurrency) = self.parse_env_var::<usize>("CONCURRENCY")? {
            config.run.concurrency = concurrency;
        }

        Ok(())
    }

    fn apply_target_overrides(
        &self,
        config: &mut crate::domains::target::TargetConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("TARGET_URL") {
            config.base_url = url;
        }

        if let Ok(host) = self.get_env_var("TARGET_HOST") {
            config.host = host;
        }

        if let Some(total) = self.parse_env_var("TOTAL_REQUESTS")? {
            config.total_requests = total;
        }

        if let Some(replicas) = self.parse_env_var("EXPECTED_REPLICAS")? {
            config.expected_replicas = replicas;
        }

        Ok(())
    }

    fn apply_retry_overrides(
        &self,
        config: &mut crate::domains::retry::RetryConfig,
    ) -> ConfigResult<()> {
        if let Some(max_retries) = self.parse_env_var("MAX_RETRIES")? {
            config.max_retries = max_retries;
        }

        if let Some(millis) = self.parse_env_var::<u64>("RETRY_DELAY_MS")? {
            config.delay = Duration::from_millis(millis);
        }

        if let Ok(statuses) = self.get_env_var("TRANSIENT_STATUSES") {
            config.transient_statuses = statuses
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u16>().map_err(|e| {
                        ConfigError::EnvError(format!("Invalid TRANSIENT_STATUSES entry '{}': {}", s, e))
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()?;
        }

        Ok(())
    }

    fn apply_identity_overrides(&self, config: &mut crate::domains::identity::IdentityConfig) {
        if let Ok(prefix) = self.get_env_var("IDENTITY_PREFIX") {
            config.prefix = prefix;
        }

        if let Ok(pattern) = self.get_env_var("IDENTITY_PATTERN") {
            config.pattern = Some(pattern);
        }
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Some(seconds) = self.parse_env_var::<u64>("HTTP_TIMEOUT")? {
            config.timeout = Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Some(verify_ssl) = self.parse_env_var("HTTP_VERIFY_SSL")? {
            config.verify_ssl = verify_ssl;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        use crate::domains::logging::{LogFormat, LogLevel};

        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Parse an optional prefixed variable
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
