use crate::divisors::sum_of_proper_divisors;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// How the divisor-sum table is populated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStrategy {
    /// One pass on the calling thread.
    #[default]
    Sequential,
    /// Per-value oracle calls spread over the rayon pool.
    Parallel,
}

impl TableStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }
}

/// Divisor sums for every value in `1..=limit`, indexed by value.
///
/// Slot 0 is unused and holds 0 so that lookups need no offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisorSumTable {
    sums: Vec<u64>,
}

impl DivisorSumTable {
    /// # Panics
    ///
    /// Panics if `limit + 1` slots cannot be addressed; callers bound the
    /// limit with [`check_limit`](crate::check_limit) first.
    pub fn build(limit: u64, strategy: TableStrategy) -> Self {
        let started = Instant::now();
        let len = limit as usize + 1;

        let sums: Vec<u64> = match strategy {
            TableStrategy::Sequential => (0..len as u64).map(sum_of_proper_divisors).collect(),
            TableStrategy::Parallel => (0..len as u64)
                .into_par_iter()
                .map(sum_of_proper_divisors)
                .collect(),
        };

        debug!(
            limit,
            strategy = strategy.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built divisor-sum table"
        );

        Self { sums }
    }

    pub fn sequential(limit: u64) -> Self {
        Self::build(limit, TableStrategy::Sequential)
    }

    /// Largest value the table covers.
    pub fn limit(&self) -> u64 {
        (self.sums.len() - 1) as u64
    }

    /// Number of covered values, i.e. `limit`.
    pub fn len(&self) -> usize {
        self.sums.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Successor of `n` under the divisor-sum function, if `n` is in `1..=limit`.
    #[inline]
    pub fn successor(&self, n: u64) -> Option<u64> {
        if n == 0 || n > self.limit() {
            return None;
        }
        Some(self.sums[n as usize])
    }
}
