//! Config-driven wiring of probe, run options and environment

use crate::config::{build_client, HttpConfig};
use crate::errors::HarnessError;
use crate::identity::IdentityExtractor;
use crate::probe::HttpProbe;
use lbprobe_config::{LbProbeConfig, RetryConfig};
use lbprobe_core::{
    run_verification, with_environment, Environment, RunOptions, RunReport, ToleranceBand,
};
use lbprobe_resilience::RetryPolicy;
use tracing::info;

/// Fixed delay between attempts
pub fn retry_policy_from_config(config: &RetryConfig) -> RetryPolicy {
    RetryPolicy::fixed(config.max_retries, config.delay)
}

/// Request count, replica count, band and concurrency for one run
pub fn run_options_from_config(config: &LbProbeConfig) -> RunOptions {
    let total = config.target.total_requests;
    let replicas = config.target.expected_replicas;

    let band = match config.tolerance.acceptable {
        Some(ref acceptable) => ToleranceBand::explicit(acceptable.iter().copied()),
        None => ToleranceBand::around_uniform(total, replicas, config.tolerance.margin),
    };

    RunOptions::new(total, replicas)
        .with_band(band)
        .with_concurrency(config.run.concurrency)
}

/// Set up `env`, run one verification against the target it returns, and
/// tear it down again.
///
/// The HTTP client and identity pattern are prepared before setup so that a
/// bad configuration never provisions anything.
pub async fn run_in_environment<E>(
    env: &mut E,
    config: &LbProbeConfig,
) -> Result<RunReport, HarnessError>
where
    E: Environment + ?Sized,
{
    let client = build_client(&HttpConfig::from(config.http.clone()))?;
    let extractor = IdentityExtractor::from_config(&config.identity)?;
    let policy = retry_policy_from_config(&config.retry);
    let transient_statuses = config.retry.transient_statuses.clone();
    let options = run_options_from_config(config);

    info!(
        total_requests = options.total_requests,
        expected_replicas = options.expected_replicas,
        band = %options.band,
        max_retries = policy.max_retries,
        "Starting load-balance verification"
    );

    let report = with_environment(env, move |target| async move {
        let probe =
            HttpProbe::with_client(client, target, policy, transient_statuses, extractor);
        run_verification(&probe, &options).await
    })
    .await?;

    Ok(report)
}
