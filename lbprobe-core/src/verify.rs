//! Distribution verification

use crate::table::ReplicaCountTable;
use crate::tolerance::{ToleranceBand, DEFAULT_MARGIN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single reason a distribution was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The table does not account for exactly the requests that were sent
    TotalMismatch { observed: u64, expected: u64 },

    /// Some replica never answered, or unexpected replicas did
    ReplicaCountMismatch { observed: usize, expected: usize },

    /// One replica's share fell outside the band
    OutOfBand {
        replica: String,
        count: u64,
        band_min: Option<u64>,
        band_max: Option<u64>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TotalMismatch { observed, expected } => write!(
                f,
                "precondition violated: counts sum to {} but {} requests were expected",
                observed, expected
            ),
            Violation::ReplicaCountMismatch { observed, expected } => write!(
                f,
                "observed {} distinct replicas, expected {}",
                observed, expected
            ),
            Violation::OutOfBand {
                replica,
                count,
                band_min,
                band_max,
            } => match (band_min, band_max) {
                (Some(min), Some(max)) => write!(
                    f,
                    "replica {} served {} requests, outside [{}, {}]",
                    replica, count, min, max
                ),
                _ => write!(
                    f,
                    "replica {} served {} requests, tolerance band is empty",
                    replica, count
                ),
            },
        }
    }
}

/// Outcome of a distribution check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub total_requests: u64,
    pub expected_replicas: usize,
    pub band: ToleranceBand,
    pub counts: ReplicaCountTable,
    pub violations: Vec<Violation>,
}

impl VerificationResult {
    /// Replicas whose count fell outside the band
    pub fn out_of_band_replicas(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| match v {
                Violation::OutOfBand { replica, .. } => Some(replica.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_precondition_violation(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::TotalMismatch { .. }))
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "distribution check {}: {} requests across {} expected replicas, band {}",
            if self.passed { "PASSED" } else { "FAILED" },
            self.total_requests,
            self.expected_replicas,
            self.band
        )?;
        for (replica, count) in self.counts.iter() {
            let marker = if self.band.contains(count) { " " } else { "!" };
            writeln!(f, "  {} {}: {}", marker, replica, count)?;
        }
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

/// Check counts against the default band around a uniform split.
///
/// For 600 requests and 3 replicas the band is `{198, ..., 202}`.
pub fn verify(
    counts: &ReplicaCountTable,
    total_requests: u64,
    expected_replicas: usize,
) -> VerificationResult {
    let band = ToleranceBand::around_uniform(total_requests, expected_replicas, DEFAULT_MARGIN);
    verify_with_band(counts, total_requests, expected_replicas, &band)
}

/// Check counts against an explicit band.
///
/// Passes iff the counts account for exactly `total_requests`, exactly
/// `expected_replicas` distinct replicas were seen, and every count is in the
/// band. A total mismatch short-circuits the other checks.
pub fn verify_with_band(
    counts: &ReplicaCountTable,
    total_requests: u64,
    expected_replicas: usize,
    band: &ToleranceBand,
) -> VerificationResult {
    let mut violations = Vec::new();

    let observed_total = counts.total();
    if observed_total != total_requests {
        violations.push(Violation::TotalMismatch {
            observed: observed_total,
            expected: total_requests,
        });
    } else {
        if counts.distinct() != expected_replicas {
            violations.push(Violation::ReplicaCountMismatch {
                observed: counts.distinct(),
                expected: expected_replicas,
            });
        }

        violations.extend(
            counts
                .iter()
                .filter(|(_, count)| !band.contains(*count))
                .map(|(replica, count)| Violation::OutOfBand {
                    replica: replica.to_string(),
                    count,
                    band_min: band.min(),
                    band_max: band.max(),
                }),
        );
    }

    VerificationResult {
        passed: violations.is_empty(),
        total_requests,
        expected_replicas,
        band: band.clone(),
        counts: counts.clone(),
        violations,
    }
}
