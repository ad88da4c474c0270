//! Scoped setup and teardown of the system under test
//!
//! Provisioning replicas, configuring the routing rule and waiting for it to
//! converge are the environment's job. The run loop only ever sees the
//! resulting [`Target`], and [`with_environment`] guarantees teardown runs
//! once the scenario is over, however it ended.

use crate::error::{EnvironmentError, RunError};
use async_trait::async_trait;
use std::future::Future;
use tracing::{debug, info, warn};
use url::Url;

/// Where requests go and which virtual host they ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: Url,
    pub host: String,
}

impl Target {
    pub fn new(url: Url, host: impl Into<String>) -> Self {
        Self {
            url,
            host: host.into(),
        }
    }

    /// Parse the URL, rejecting anything that is not http(s)
    pub fn parse(url: &str, host: impl Into<String>) -> Result<Self, EnvironmentError> {
        let url = Url::parse(url)
            .map_err(|e| EnvironmentError::Setup(format!("invalid target url {url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(Self::new(url, host)),
            scheme => Err(EnvironmentError::Setup(format!(
                "unsupported target scheme '{scheme}'"
            ))),
        }
    }
}

/// Collaborator that stands up N replicas behind one routable host.
///
/// Implementations must return from `setup` only once routing has converged;
/// the driver does not poll for readiness beyond its retry budget.
#[async_trait]
pub trait Environment: Send {
    /// Provision the system under test and return where to send requests
    async fn setup(&mut self) -> Result<Target, EnvironmentError>;

    /// Restore routing configuration to its default. Must be idempotent.
    async fn teardown(&mut self) -> Result<(), EnvironmentError>;
}

/// An already-provisioned target; setup and teardown are no-ops
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    target: Target,
}

impl StaticEnvironment {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Environment for StaticEnvironment {
    async fn setup(&mut self) -> Result<Target, EnvironmentError> {
        Ok(self.target.clone())
    }

    async fn teardown(&mut self) -> Result<(), EnvironmentError> {
        Ok(())
    }
}

/// Run `scenario` between `setup` and `teardown`.
///
/// Teardown is attempted even when setup or the scenario fails. The first
/// failure wins; a teardown failure after a failed scenario is only logged.
pub async fn with_environment<E, F, Fut, T>(env: &mut E, scenario: F) -> Result<T, RunError>
where
    E: Environment + ?Sized,
    F: FnOnce(Target) -> Fut,
    Fut: Future<Output = Result<T, RunError>>,
{
    let target = match env.setup().await {
        Ok(target) => target,
        Err(setup_error) => {
            if let Err(teardown_error) = env.teardown().await {
                warn!("Teardown after failed setup also failed: {}", teardown_error);
            }
            return Err(setup_error.into());
        }
    };

    info!(url = %target.url, host = %target.host, "Environment ready");
    let outcome = scenario(target).await;

    match env.teardown().await {
        Ok(()) => {
            debug!("Environment torn down");
            outcome
        }
        Err(teardown_error) => match outcome {
            Ok(_) => Err(teardown_error.into()),
            Err(run_error) => {
                warn!("Teardown failed after run error: {}", teardown_error);
                Err(run_error)
            }
        },
    }
}
