//! HTTP configuration

use crate::errors::HttpError;
use lbprobe_config::domains::http::HttpConfig as ConfigHttpConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-attempt request timeout
    pub timeout: Duration,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,

    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ConfigHttpConfig::default().into()
    }
}

impl From<ConfigHttpConfig> for HttpConfig {
    fn from(config: ConfigHttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connection_pool.connection_timeout,
            user_agent: config.user_agent,
            verify_ssl: config.verify_ssl,
            pool_max_idle_per_host: config.connection_pool.max_idle_per_host,
            pool_idle_timeout: config.connection_pool.idle_timeout,
        }
    }
}

/// Build the shared client. Redirects are not followed: a 3xx is reported as
/// an unexpected status rather than silently landing on another backend.
pub fn build_client(config: &HttpConfig) -> Result<Client, HttpError> {
    debug!(
        "Creating HTTP client with {}s timeout",
        config.timeout.as_secs()
    );
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .danger_accept_invalid_certs(!config.verify_ssl)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(HttpError::ClientBuild)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_from_config_domain() {
        let mut domain = ConfigHttpConfig::default();
        domain.timeout = Duration::from_secs(3);
        domain.verify_ssl = false;

        let config = HttpConfig::from(domain);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(!config.verify_ssl);
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_default_follows_config_domain_defaults() {
        assert_eq!(
            HttpConfig::default(),
            HttpConfig::from(ConfigHttpConfig::default())
        );
        assert!(build_client(&HttpConfig::default()).is_ok());
    }
}
