//! Tolerance band configuration

use super::target::TargetConfig;
use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Acceptable per-replica counts.
///
/// Either an explicit list, or a margin around `total_requests /
/// expected_replicas`. The explicit list wins when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Half-width of the band around the ideal share
    #[serde(default = "default_margin")]
    pub margin: u64,

    /// Literal acceptable counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptable: Option<Vec<u64>>,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            acceptable: None,
        }
    }
}

impl ToleranceConfig {
    /// Check the margin against the split it is applied to.
    ///
    /// A margin wider than the ideal share would accept a replica that
    /// served nothing, so it is rejected. An explicit list is not affected.
    pub fn validate_for_target(&self, target: &TargetConfig) -> ConfigResult<()> {
        if self.acceptable.is_some() {
            return Ok(());
        }
        let Some(ideal) = target
            .total_requests
            .checked_div(target.expected_replicas as u64)
        else {
            return Ok(());
        };
        if self.margin > ideal {
            return Err(self.validation_error(format!(
                "margin {} exceeds the ideal share of {} requests per replica",
                self.margin, ideal
            )));
        }
        Ok(())
    }
}

impl Validatable for ToleranceConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(ref acceptable) = self.acceptable {
            if acceptable.is_empty() {
                return Err(self.validation_error("acceptable must list at least one count"));
            }
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "tolerance"
    }
}

fn default_margin() -> u64 {
    2
}
