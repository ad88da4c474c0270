//! Single-pass run loop
//!
//! Drives an [`ObservationSource`] a fixed number of times, aggregates every
//! observation into a [`ReplicaCountTable`] and verifies the table once at the
//! end. The first fatal request error aborts the run; no partial table is
//! verified.

use crate::error::{ProbeError, RunError};
use crate::observation::Observation;
use crate::table::ReplicaCountTable;
use crate::tolerance::{ToleranceBand, DEFAULT_MARGIN};
use crate::verify::{verify_with_band, VerificationResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Something that can perform one request and report which replica served it
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Perform the `iteration`th request (0-indexed)
    async fn observe(&self, iteration: u64) -> Result<Observation, ProbeError>;
}

/// How many requests to send and what counts as a fair split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub total_requests: u64,
    pub expected_replicas: usize,
    pub band: ToleranceBand,
    /// Requests in flight at once; 1 reproduces the strictly sequential run
    pub concurrency: usize,
}

impl RunOptions {
    /// Sequential run with the default band around a uniform split
    pub fn new(total_requests: u64, expected_replicas: usize) -> Self {
        Self {
            total_requests,
            expected_replicas,
            band: ToleranceBand::around_uniform(total_requests, expected_replicas, DEFAULT_MARGIN),
            concurrency: 1,
        }
    }

    /// 600 requests, 3 replicas, `{198..=202}`
    pub fn canonical() -> Self {
        Self::new(600, 3)
    }

    pub fn with_band(mut self, band: ToleranceBand) -> Self {
        self.band = band;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.total_requests == 0 {
            return Err(RunError::InvalidOptions(
                "total_requests must be greater than 0".to_string(),
            ));
        }
        if self.expected_replicas == 0 {
            return Err(RunError::InvalidOptions(
                "expected_replicas must be greater than 0".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(RunError::InvalidOptions(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        if self.band.is_empty() {
            return Err(RunError::InvalidOptions(
                "tolerance band must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything known about a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub concurrency: usize,
    pub verification: VerificationResult,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.verification.passed
    }
}

/// Send every request and aggregate the observations.
///
/// With `concurrency > 1` requests overlap, but this function stays the only
/// writer of the table.
pub async fn collect_observations<S>(
    source: &S,
    options: &RunOptions,
) -> Result<ReplicaCountTable, RunError>
where
    S: ObservationSource + ?Sized,
{
    let mut table = ReplicaCountTable::new();
    let progress_every = (options.total_requests / 10).max(1);

    if options.concurrency <= 1 {
        for iteration in 0..options.total_requests {
            let observation = source
                .observe(iteration)
                .await
                .map_err(|source| abort(iteration, source))?;
            table.record(observation);
            log_progress(&table, options, progress_every);
        }
    } else {
        let mut responses = stream::iter(0..options.total_requests)
            .map(|iteration| async move {
                source
                    .observe(iteration)
                    .await
                    .map_err(|source| abort(iteration, source))
            })
            .buffer_unordered(options.concurrency);

        while let Some(result) = responses.next().await {
            table.record(result?);
            log_progress(&table, options, progress_every);
        }
    }

    Ok(table)
}

/// Run the full loop and verify the resulting distribution.
///
/// Returns `Ok` for any completed run, passing or not; `Err` only when a
/// request failed fatally or the options are unusable.
pub async fn run_verification<S>(source: &S, options: &RunOptions) -> Result<RunReport, RunError>
where
    S: ObservationSource + ?Sized,
{
    options.validate()?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let clock = Instant::now();

    info!(
        %run_id,
        total_requests = options.total_requests,
        expected_replicas = options.expected_replicas,
        concurrency = options.concurrency,
        band = %options.band,
        "Starting distribution run"
    );

    let counts = collect_observations(source, options).await?;
    let verification = verify_with_band(
        &counts,
        options.total_requests,
        options.expected_replicas,
        &options.band,
    );

    let elapsed = clock.elapsed();
    if verification.passed {
        info!(%run_id, elapsed_ms = elapsed.as_millis() as u64, "Distribution within tolerance");
    } else {
        warn!(%run_id, "Distribution outside tolerance:\n{}", verification);
    }

    Ok(RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        elapsed_ms: elapsed.as_millis() as u64,
        concurrency: options.concurrency,
        verification,
    })
}

fn abort(iteration: u64, source: ProbeError) -> RunError {
    error!(iteration, kind = source.kind(), "Aborting run: {}", source);
    RunError::Probe { iteration, source }
}

fn log_progress(table: &ReplicaCountTable, options: &RunOptions, every: u64) {
    let done = table.total();
    if done % every == 0 {
        debug!(
            done,
            total = options.total_requests,
            replicas_seen = table.distinct(),
            "Run progress"
        );
    }
}
