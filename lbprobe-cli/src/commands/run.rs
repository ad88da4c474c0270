//! `lbprobe run`

use super::environment::CommandEnvironment;
use anyhow::{Context, Result};
use lbprobe_config::LbProbeConfig;
use lbprobe_core::RunReport;
use lbprobe_http::run_in_environment;
use tracing::{info, warn};

/// How a completed command should end the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Passed,
    DistributionViolated,
}

/// Command-line values that take precedence over file and environment config
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    pub url: Option<String>,
    pub host: Option<String>,
    pub requests: Option<u64>,
    pub replicas: Option<usize>,
    pub concurrency: Option<usize>,
}

impl RunOverrides {
    pub fn apply(self, config: &mut LbProbeConfig) {
        if let Some(url) = self.url {
            config.target.base_url = url;
        }
        if let Some(host) = self.host {
            config.target.host = host;
        }
        if let Some(requests) = self.requests {
            config.target.total_requests = requests;
        }
        if let Some(replicas) = self.replicas {
            config.target.expected_replicas = replicas;
        }
        if let Some(concurrency) = self.concurrency {
            config.run.concurrency = concurrency;
        }
    }
}

pub async fn run_command(
    mut config: LbProbeConfig,
    overrides: RunOverrides,
    json: bool,
) -> Result<RunOutcome> {
    overrides.apply(&mut config);
    config
        .validate_all()
        .context("Invalid configuration after command-line overrides")?;

    let mut env = CommandEnvironment::from_config(&config)?;
    let report = run_in_environment(&mut env, &config)
        .await
        .context("Verification run aborted")?;

    println!("{}", render_report(&report, json)?);

    if report.passed() {
        info!(run_id = %report.run_id, "Load-balance verification passed");
        Ok(RunOutcome::Passed)
    } else {
        warn!(
            run_id = %report.run_id,
            violations = report.verification.violations.len(),
            "Load-balance verification failed"
        );
        Ok(RunOutcome::DistributionViolated)
    }
}

fn render_report(report: &RunReport, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("Failed to serialize run report");
    }

    Ok(format!(
        "run {} finished in {} ms (concurrency {})\n{}",
        report.run_id,
        report.elapsed_ms,
        report.concurrency,
        report.verification.to_string().trim_end()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = LbProbeConfig::default();
        RunOverrides {
            url: Some("http://10.1.1.1/".to_string()),
            requests: Some(90),
            concurrency: Some(3),
            ..RunOverrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.target.base_url, "http://10.1.1.1/");
        assert_eq!(config.target.total_requests, 90);
        assert_eq!(config.target.expected_replicas, 3);
        assert_eq!(config.target.host, "load-balance.com");
        assert_eq!(config.run.concurrency, 3);
    }

    #[tokio::test]
    async fn test_invalid_override_is_rejected_before_running() {
        let overrides = RunOverrides {
            replicas: Some(0),
            ..RunOverrides::default()
        };
        let err = run_command(LbProbeConfig::default(), overrides, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
