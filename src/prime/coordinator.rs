//! Coordinator for a single target value
//!
//! `TrialDivisionTester` owns the only mutable state of a check: whether a
//! factor has been recorded. Workers never write it; they return a
//! [`SearchOutcome`] and the coordinator records the first factor it sees.
//! Once recorded, the state is sticky and later checks answer `false`
//! without searching again.

use super::partition;
use super::worker::{RangeWorker, SearchOutcome};
use super::{CheckOptions, PrimeProcessor};
use crate::cancel::CancelToken;
use crate::error::CheckError;
use crate::executor::{CompletionService, Executor, TakeError, TaskOutcome};
use num_bigint::BigUint;
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Decision state of a tester
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    /// No factor recorded yet
    Undetermined,
    /// A factor was recorded; the target is composite
    Composite(BigUint),
}

/// Which branch the most recent check took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
    /// A factor was already recorded
    AlreadyDecided,
    /// Target is even
    EvenFastPath,
    /// Too few values per worker; searched on the calling thread
    Sequential,
    /// Sub-ranges dispatched to the executor
    Parallel,
}

/// Bookkeeping for the most recent check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStats {
    pub path: SearchPath,
    /// Tasks accepted by the executor
    pub tasks_dispatched: usize,
    /// Completions drained before the check returned
    pub tasks_completed: usize,
    pub elapsed: Duration,
}

/// Parallel trial-division tester for one target value
pub struct TrialDivisionTester {
    n: Arc<BigUint>,
    state: CheckState,
    last_stats: Option<CheckStats>,
}

impl TrialDivisionTester {
    pub fn new(n: BigUint) -> Self {
        Self {
            n: Arc::new(n),
            state: CheckState::Undetermined,
            last_stats: None,
        }
    }

    pub fn target(&self) -> &BigUint {
        &self.n
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    /// Stats of the most recent check, if one has completed or failed
    pub fn last_stats(&self) -> Option<&CheckStats> {
        self.last_stats.as_ref()
    }

    /// Run a check with explicit partitioning, cancellation and timeout
    ///
    /// # Errors
    ///
    /// - `InvalidParallelism` if `options.parallelism` is zero and the target is still
    ///   undecided after the sticky and even checks; nothing is submitted
    /// - `WorkerFailed` if any sub-range task faults
    /// - `Cancelled` / `TimedOut` if `options.cancel` fires or the timeout elapses
    /// - `Executor` if the executor refuses a task
    pub fn is_prime_with(&mut self, executor: &dyn Executor, options: &CheckOptions) -> Result<bool, CheckError> {
        let started = Instant::now();

        if let CheckState::Composite(factor) = &self.state {
            debug!(n = %self.n, factor = %factor, "factor already recorded, skipping search");
            self.finish(SearchPath::AlreadyDecided, 0, 0, started);
            return Ok(false);
        }

        if self.n.is_even() {
            debug!(n = %self.n, "even target, recording factor 2");
            self.record(BigUint::from(2u32));
            self.finish(SearchPath::EvenFastPath, 0, 0, started);
            return Ok(false);
        }

        if options.parallelism == 0 {
            return Err(CheckError::InvalidParallelism(options.parallelism));
        }

        let interrupt = match options.timeout {
            Some(timeout) => options.cancel.child_with_timeout(timeout),
            None => options.cancel.child(),
        };

        let per_worker = partition::values_per_worker(&self.n, options.parallelism);
        if !partition::worth_parallelizing(&per_worker) {
            debug!(n = %self.n, per_worker = %per_worker, "too few values per worker, searching on calling thread");
            let worker = RangeWorker::new(Arc::clone(&self.n), BigUint::from(3u32), (*self.n).clone());
            let outcome = worker.search(&interrupt);
            self.finish(SearchPath::Sequential, 0, 0, started);
            return match outcome {
                SearchOutcome::Found(factor) => {
                    self.record(factor);
                    Ok(false)
                }
                SearchOutcome::Exhausted => Ok(true),
                SearchOutcome::Cancelled => Err(interruption(&interrupt, options.timeout)),
            };
        }

        self.search_parallel(executor, options, &interrupt, started)
    }

    fn search_parallel(
        &mut self,
        executor: &dyn Executor,
        options: &CheckOptions,
        interrupt: &CancelToken,
        started: Instant,
    ) -> Result<bool, CheckError> {
        let ranges = partition::partition(&self.n, options.parallelism, options.partition);
        if let Some((from, to)) = partition::untested_tail(&self.n, options.parallelism, options.partition) {
            debug!(n = %self.n, from = %from, to = %to, "reference partitioning leaves candidates unsearched");
        }
        debug!(n = %self.n, sub_ranges = ranges.len(), mode = %options.partition, "dispatching workers");

        let mut service = CompletionService::new(executor, interrupt);
        for range in &ranges {
            let (start, end) = range.closed_bounds();
            trace!(index = range.index, start = %start, end = %end, "submitting sub-range");
            let worker = RangeWorker::new(Arc::clone(&self.n), start, end);
            if let Err(e) = service.submit(move |cancel| worker.search(cancel)) {
                self.finish(SearchPath::Parallel, service.submitted(), 0, started);
                return Err(e.into());
            }
        }

        let dispatched = service.submitted();
        let mut completed = 0;

        let verdict = loop {
            let completion = match service.take_until(interrupt) {
                Ok(completion) => completion,
                Err(TakeError::Empty) => break Ok(true),
                Err(TakeError::Cancelled) => break Err(CheckError::Cancelled),
                Err(TakeError::TimedOut) => break Err(timed_out(options.timeout)),
            };
            completed += 1;
            trace!(index = completion.index, completed, "sub-range finished");

            match completion.outcome {
                TaskOutcome::Completed(SearchOutcome::Found(factor)) => {
                    info!(n = %self.n, factor = %factor, index = completion.index, "factor found");
                    self.record(factor);
                    break Ok(false);
                }
                TaskOutcome::Completed(SearchOutcome::Exhausted) => continue,
                TaskOutcome::Completed(SearchOutcome::Cancelled) | TaskOutcome::Cancelled => {
                    break Err(interruption(interrupt, options.timeout));
                }
                TaskOutcome::Failed(message) => {
                    warn!(index = completion.index, error = %message, "worker failed");
                    break Err(CheckError::WorkerFailed {
                        index: completion.index,
                        message,
                    });
                }
            }
        };

        if service.outstanding() > 0 {
            trace!(outstanding = service.outstanding(), "cancelling remaining sub-ranges");
            service.cancel_all();
        }
        if let Err(e) = &verdict {
            if e.is_interruption() {
                warn!(n = %self.n, error = %e, "check interrupted");
            }
        }

        self.finish(SearchPath::Parallel, dispatched, completed, started);
        verdict
    }

    fn record(&mut self, factor: BigUint) {
        debug_assert_eq!(self.state, CheckState::Undetermined);
        self.state = CheckState::Composite(factor);
    }

    fn finish(&mut self, path: SearchPath, tasks_dispatched: usize, tasks_completed: usize, started: Instant) {
        self.last_stats = Some(CheckStats {
            path,
            tasks_dispatched,
            tasks_completed,
            elapsed: started.elapsed(),
        });
    }
}

impl PrimeProcessor for TrialDivisionTester {
    fn is_prime(&mut self, executor: &dyn Executor, parallelism: usize) -> Result<bool, CheckError> {
        self.is_prime_with(executor, &CheckOptions::new(parallelism))
    }

    fn factor(&self) -> Option<&BigUint> {
        match &self.state {
            CheckState::Composite(factor) => Some(factor),
            CheckState::Undetermined => None,
        }
    }
}

fn interruption(interrupt: &CancelToken, timeout: Option<Duration>) -> CheckError {
    if interrupt.deadline_passed() {
        timed_out(timeout)
    } else {
        CheckError::Cancelled
    }
}

fn timed_out(timeout: Option<Duration>) -> CheckError {
    CheckError::TimedOut(timeout.unwrap_or_default())
}
