//! Range worker: linear odd-only trial division over one sub-range

use crate::cancel::CancelToken;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use std::sync::Arc;

/// Candidates tested between two cancellation checks
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Result of searching one sub-range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A divisor of the target
    Found(BigUint),
    /// Every candidate in the range was tested, none divides the target
    Exhausted,
    /// The search stopped early on request
    Cancelled,
}

/// Trial-division worker over a closed range of odd candidates
///
/// Bounds are normalized once at construction:
/// - an even start moves up to the next odd value
/// - a start of 1 moves to 3
/// - an end equal to the target moves down by one
///
/// The search then tests `start, start + 2, ...` up to and including `end`.
/// It does not stop at the square root of the target.
#[derive(Debug, Clone)]
pub struct RangeWorker {
    target: Arc<BigUint>,
    start: BigUint,
    end: BigUint,
}

impl RangeWorker {
    pub fn new(target: Arc<BigUint>, raw_start: BigUint, raw_end: BigUint) -> Self {
        let mut start = raw_start;
        if start.is_even() {
            start += 1u32;
        }
        if start.is_one() {
            start += 2u32;
        }

        let mut end = raw_end;
        if end == *target && !end.is_zero() {
            end -= 1u32;
        }

        Self { target, start, end }
    }

    /// First candidate tested
    pub fn start(&self) -> &BigUint {
        &self.start
    }

    /// Last candidate that may be tested
    pub fn end(&self) -> &BigUint {
        &self.end
    }

    /// Search the whole range and return the first divisor found
    pub fn run(&self) -> Option<BigUint> {
        match self.search(&CancelToken::new()) {
            SearchOutcome::Found(factor) => Some(factor),
            SearchOutcome::Exhausted | SearchOutcome::Cancelled => None,
        }
    }

    /// Search the range, polling `cancel` every [`CANCEL_CHECK_INTERVAL`] candidates
    pub fn search(&self, cancel: &CancelToken) -> SearchOutcome {
        let two = BigUint::from(2u32);
        let mut current = self.start.clone();
        let mut tested: u64 = 0;

        while current <= self.end {
            if tested % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return SearchOutcome::Cancelled;
            }
            if (&*self.target % &current).is_zero() {
                return SearchOutcome::Found(current);
            }
            current += &two;
            tested += 1;
        }

        SearchOutcome::Exhausted
    }
}
