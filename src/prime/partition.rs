//! Sub-range partitioning of the candidate divisor space
//!
//! For a target `n` and parallelism `p`, each worker gets `n / p` consecutive
//! values. Sub-range `i` is the half-open interval
//! `[values_per_worker * i, values_per_worker * (i + 1))`, so neighbouring
//! ranges share no candidate.
//!
//! In [`PartitionMode::Reference`] the last range stops at
//! `values_per_worker * p`. When `p` does not divide `n` the candidates from
//! there up to `n - 1` are never searched. Since parallel search only runs
//! when `values_per_worker >= 10`, that tail holds fewer than `p` values all
//! above `0.9 * n`, so it can hide a factor but never the smallest one, and
//! the verdict is unaffected. [`PartitionMode::Exhaustive`] stretches the last
//! range to `n` instead.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this many values per worker a check runs on the calling thread
pub const MIN_VALUES_PER_WORKER: u32 = 10;

/// How the tail left over by integer division is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionMode {
    /// Last range ends at `values_per_worker * parallelism`
    #[default]
    Reference,
    /// Last range ends at the target, covering every candidate
    Exhaustive,
}

impl fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionMode::Reference => write!(f, "reference"),
            PartitionMode::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Half-open slice `[start, end)` of candidate divisors for one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRange {
    pub index: usize,
    pub start: BigUint,
    pub end: BigUint,
}

impl SubRange {
    /// Inclusive `(first, last)` bounds as taken by `RangeWorker::new`
    pub fn closed_bounds(&self) -> (BigUint, BigUint) {
        let last = if self.end.is_zero() {
            BigUint::zero()
        } else {
            &self.end - BigUint::one()
        };
        (self.start.clone(), last)
    }
}

/// `n / parallelism`, truncated
pub fn values_per_worker(n: &BigUint, parallelism: usize) -> BigUint {
    n / BigUint::from(parallelism)
}

/// Whether a sub-range this size is worth handing to another thread
pub fn worth_parallelizing(values_per_worker: &BigUint) -> bool {
    *values_per_worker >= BigUint::from(MIN_VALUES_PER_WORKER)
}

/// Split the candidate space of `n` into `parallelism` contiguous sub-ranges
pub fn partition(n: &BigUint, parallelism: usize, mode: PartitionMode) -> Vec<SubRange> {
    let per_worker = values_per_worker(n, parallelism);

    (0..parallelism)
        .map(|i| {
            let start = &per_worker * BigUint::from(i);
            let end = if mode == PartitionMode::Exhaustive && i + 1 == parallelism {
                n.clone()
            } else {
                &per_worker * BigUint::from(i + 1)
            };
            SubRange { index: i, start, end }
        })
        .collect()
}

/// Inclusive range of candidates a partition leaves unsearched, if any
pub fn untested_tail(n: &BigUint, parallelism: usize, mode: PartitionMode) -> Option<(BigUint, BigUint)> {
    if mode == PartitionMode::Exhaustive || parallelism == 0 {
        return None;
    }
    let covered = values_per_worker(n, parallelism) * BigUint::from(parallelism);
    if n.is_zero() || covered >= n - BigUint::one() {
        // `n - 1` on its own never divides `n` once `n > 2`
        return None;
    }
    Some((covered, n - BigUint::one()))
}
