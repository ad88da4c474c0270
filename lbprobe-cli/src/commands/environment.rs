//! Environment backed by shell hooks from the `environment` config domain

use async_trait::async_trait;
use lbprobe_config::LbProbeConfig;
use lbprobe_core::{Environment, EnvironmentError, Target};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs `environment.setup` before the scenario and `environment.teardown`
/// after it, each through `sh -c`.
///
/// Hooks see `LBPROBE_TARGET_URL`, `LBPROBE_TARGET_HOST` and
/// `LBPROBE_EXPECTED_REPLICAS`. A missing hook is a no-op.
#[derive(Debug, Clone)]
pub struct CommandEnvironment {
    target: Target,
    expected_replicas: usize,
    setup: Option<String>,
    teardown: Option<String>,
}

impl CommandEnvironment {
    pub fn from_config(config: &LbProbeConfig) -> Result<Self, EnvironmentError> {
        Ok(Self {
            target: Target::parse(&config.target.base_url, config.target.host.clone())?,
            expected_replicas: config.target.expected_replicas,
            setup: config.environment.setup.clone(),
            teardown: config.environment.teardown.clone(),
        })
    }

    async fn run_hook(&self, stage: &str, command: &str) -> Result<(), String> {
        info!(stage, command, "Running environment hook");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .env("LBPROBE_TARGET_URL", self.target.url.as_str())
            .env("LBPROBE_TARGET_HOST", &self.target.host)
            .env(
                "LBPROBE_EXPECTED_REPLICAS",
                self.expected_replicas.to_string(),
            )
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to spawn `{}`: {}", command, e))?;

        if output.status.success() {
            debug!(stage, "Environment hook finished");
            Ok(())
        } else {
            Err(format!(
                "`{}` exited with {}: {}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        }
    }
}

#[async_trait]
impl Environment for CommandEnvironment {
    async fn setup(&mut self) -> Result<Target, EnvironmentError> {
        if let Some(ref command) = self.setup {
            self.run_hook("setup", command)
                .await
                .map_err(EnvironmentError::Setup)?;
        }
        Ok(self.target.clone())
    }

    async fn teardown(&mut self) -> Result<(), EnvironmentError> {
        if let Some(ref command) = self.teardown {
            self.run_hook("teardown", command)
                .await
                .map_err(EnvironmentError::Teardown)?;
        }
        Ok(())
    }
}
