//! Acceptable per-replica counts

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Half-width of the band used when none is configured.
///
/// With 600 requests over 3 replicas this gives the literal band
/// `{198, 199, 200, 201, 202}`.
pub const DEFAULT_MARGIN: u64 = 2;

/// Contiguous bands wider than this print as `{min..=max}`
const DISPLAY_LIST_LIMIT: u64 = 8;

/// Inclusive set of per-replica counts considered a fair split.
///
/// The band is fixed policy for a given request volume and replica count; it
/// is not derived from observed variance. It serializes as the list of
/// accepted counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<u64>")]
pub struct ToleranceBand {
    counts: Counts,
}

/// Contiguous bands are kept as bounds so their size never depends on the
/// margin. Only a sparse explicit list is stored value by value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Counts {
    Range { min: u64, max: u64 },
    Sparse(BTreeSet<u64>),
}

impl ToleranceBand {
    /// Literal enumerated band
    pub fn explicit<I: IntoIterator<Item = u64>>(values: I) -> Self {
        let values: BTreeSet<u64> = values.into_iter().collect();
        let bounds = values.first().copied().zip(values.last().copied());
        let counts = match bounds {
            Some((min, max)) if max - min == values.len() as u64 - 1 => Counts::Range { min, max },
            _ => Counts::Sparse(values),
        };
        Self { counts }
    }

    /// `ideal ± margin` where `ideal = total / replicas` (truncating).
    ///
    /// The lower end saturates at zero. Zero replicas yields an empty band,
    /// which rejects every count.
    pub fn around_uniform(total: u64, replicas: usize, margin: u64) -> Self {
        let Some(ideal) = total.checked_div(replicas as u64) else {
            return Self::explicit([]);
        };
        Self {
            counts: Counts::Range {
                min: ideal.saturating_sub(margin),
                max: ideal.saturating_add(margin),
            },
        }
    }

    /// The reference band for 600 requests across 3 replicas
    pub fn canonical() -> Self {
        Self::explicit([198, 199, 200, 201, 202])
    }

    pub fn contains(&self, count: u64) -> bool {
        match &self.counts {
            Counts::Range { min, max } => (*min..=*max).contains(&count),
            Counts::Sparse(values) => values.contains(&count),
        }
    }

    pub fn min(&self) -> Option<u64> {
        match &self.counts {
            Counts::Range { min, .. } => Some(*min),
            Counts::Sparse(values) => values.first().copied(),
        }
    }

    pub fn max(&self) -> Option<u64> {
        match &self.counts {
            Counts::Range { max, .. } => Some(*max),
            Counts::Sparse(values) => values.last().copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.counts {
            Counts::Range { .. } => false,
            Counts::Sparse(values) => values.is_empty(),
        }
    }

    /// Number of accepted counts, saturating for a band covering all of `u64`
    pub fn len(&self) -> u64 {
        match &self.counts {
            Counts::Range { min, max } => (max - min).saturating_add(1),
            Counts::Sparse(values) => values.len() as u64,
        }
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = u64> + '_> {
        match &self.counts {
            Counts::Range { min, max } => Box::new(*min..=*max),
            Counts::Sparse(values) => Box::new(values.iter().copied()),
        }
    }
}

impl From<Vec<u64>> for ToleranceBand {
    fn from(values: Vec<u64>) -> Self {
        Self::explicit(values)
    }
}

impl Serialize for ToleranceBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

impl fmt::Display for ToleranceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Counts::Range { min, max } = self.counts {
            if self.len() > DISPLAY_LIST_LIMIT {
                return write!(f, "{{{}..={}}}", min, max);
            }
        }
        let values: Vec<String> = self.values().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", values.join(", "))
    }
}
