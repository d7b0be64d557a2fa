//! Batch execution of primality checks
//!
//! Runs one check per number against a shared executor and collects a
//! [`CheckRecord`] for each, so reports can be rendered after the fact.
//! A failure on one number does not stop the others.

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::CheckError;
use crate::executor::Executor;
use crate::prime::{partition, CheckOptions, CheckStats, PrimeProcessor, SearchPath, TrialDivisionTester};
use num_bigint::BigUint;
use tracing::{error, info};

/// Final answer for one number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Prime,
    Composite,
    /// The check failed; primality is unknown
    Undetermined,
}

/// Outcome of checking one number
#[derive(Debug)]
pub struct CheckRecord {
    pub number: BigUint,
    pub outcome: Result<bool, CheckError>,
    pub factor: Option<BigUint>,
    pub stats: Option<CheckStats>,
    /// Candidates skipped by reference partitioning, inclusive
    pub untested_tail: Option<(BigUint, BigUint)>,
}

impl CheckRecord {
    pub fn verdict(&self) -> Verdict {
        match self.outcome {
            Ok(true) => Verdict::Prime,
            Ok(false) => Verdict::Composite,
            Err(_) => Verdict::Undetermined,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Check every number in turn
pub fn run_checks(numbers: &[BigUint], executor: &dyn Executor, config: &Config, cancel: &CancelToken) -> Vec<CheckRecord> {
    numbers
        .iter()
        .map(|n| run_check(n, executor, config, cancel))
        .collect()
}

/// Check a single number
pub fn run_check(number: &BigUint, executor: &dyn Executor, config: &Config, cancel: &CancelToken) -> CheckRecord {
    let options = CheckOptions::new(config.check.parallelism)
        .with_partition(config.check.partition)
        .with_cancel(cancel.clone())
        .with_timeout(config.timeout());

    let mut tester = TrialDivisionTester::new(number.clone());
    let outcome = tester.is_prime_with(executor, &options);

    match &outcome {
        Ok(prime) => info!(n = %number, prime, "check complete"),
        Err(e) => error!(n = %number, error = %e, "check failed"),
    }

    let stats = tester.last_stats().cloned();
    let untested_tail = match &stats {
        Some(s) if s.path == SearchPath::Parallel => {
            partition::untested_tail(number, options.parallelism, options.partition)
        }
        _ => None,
    };

    CheckRecord {
        number: number.clone(),
        outcome,
        factor: tester.factor().cloned(),
        stats,
        untested_tail,
    }
}
