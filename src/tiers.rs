//! Nearest-lower-bound lookups over threshold schedules
//!
//! Used for the state contribution schedule: the state matches a user's monthly
//! contribution according to the highest tier the contribution reaches.

use serde::{Deserialize, Serialize};

/// One schedule entry: `value` applies to queries at or above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: i64,
    pub value: i64,
}

impl Tier {
    pub fn new(threshold: i64, value: i64) -> Self {
        Self { threshold, value }
    }
}

/// Ordered threshold schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierSchedule {
    /// Entries sorted by threshold (stable, so equal thresholds keep their input order)
    tiers: Vec<Tier>,
}

impl TierSchedule {
    /// Create a schedule, sorting entries by threshold ascending
    pub fn new(mut tiers: Vec<Tier>) -> Self {
        tiers.sort_by_key(|t| t.threshold);
        Self { tiers }
    }

    /// Create from `(threshold, value)` pairs
    pub fn from_pairs(pairs: &[(i64, i64)]) -> Self {
        Self::new(pairs.iter().map(|&(t, v)| Tier::new(t, v)).collect())
    }

    /// Value of the largest threshold that does not exceed `query`.
    ///
    /// The whole table is scanned and the maximum qualifying threshold tracked,
    /// so the answer does not depend on storage order. When several entries
    /// share that threshold the first one wins. A query below every threshold
    /// resolves to 0: no tier reached means nothing is matched, which is a
    /// valid outcome rather than an error.
    pub fn resolve(&self, query: f64) -> i64 {
        let mut best: Option<&Tier> = None;

        for tier in &self.tiers {
            if tier.threshold as f64 > query {
                continue;
            }
            match best {
                Some(current) if tier.threshold <= current.threshold => {}
                _ => best = Some(tier),
            }
        }

        best.map(|t| t.value).unwrap_or(0)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
