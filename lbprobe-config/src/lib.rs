//! Domain-driven configuration management for lbprobe
//!
//! Configuration is split by functional domain (target, retry, tolerance,
//! identity extraction, HTTP client, logging, run shape, environment hooks),
//! each with its own defaults and validation, and can be loaded from YAML with
//! `LBPROBE_*` environment overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    environment::EnvironmentConfig, http::HttpConfig, identity::IdentityConfig,
    logging::LoggingConfig, retry::RetryConfig, run::RunConfig, target::TargetConfig,
    tolerance::ToleranceConfig, LbProbeConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_duration_ms};
