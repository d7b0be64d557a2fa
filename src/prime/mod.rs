//! Parallel trial-division primality checking
//!
//! # Architecture
//!
//! - **Coordinator** ([`TrialDivisionTester`]): decides whether a check is worth
//!   parallelizing, partitions the candidate space, submits one
//!   [`RangeWorker`] per sub-range, and drains results in completion order,
//!   cancelling everything else as soon as a factor arrives
//! - **RangeWorker** ([`worker::RangeWorker`]): odd-only linear trial division
//!   over one closed sub-range
//! - **Partitioning** ([`partition`]): sub-range arithmetic
//!
//! # Example
//!
//! ```no_run
//! use primepulse::executor::WorkerPool;
//! use primepulse::prime::{PrimeProcessor, TrialDivisionTester};
//! use num_bigint::BigUint;
//!
//! let pool = WorkerPool::new(4)?;
//! let mut tester = TrialDivisionTester::new(BigUint::from(91u32));
//!
//! assert!(!tester.is_prime(&pool, 4)?);
//! println!("factor: {}", tester.factor().unwrap());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod coordinator;
pub mod partition;
pub mod worker;

pub use coordinator::{CheckState, CheckStats, SearchPath, TrialDivisionTester};
pub use partition::{PartitionMode, SubRange};
pub use worker::{RangeWorker, SearchOutcome};

use crate::cancel::CancelToken;
use crate::error::CheckError;
use crate::executor::Executor;
use num_bigint::BigUint;
use std::time::Duration;

/// A primality test that can run on a caller-supplied executor
pub trait PrimeProcessor {
    /// Decide whether the target is prime, searching with `parallelism` tasks
    ///
    /// # Errors
    ///
    /// Any error means the verdict is unknown. See [`CheckError`].
    fn is_prime(&mut self, executor: &dyn Executor, parallelism: usize) -> Result<bool, CheckError>;

    /// Factor recorded by a previous check that returned `false`
    fn factor(&self) -> Option<&BigUint>;
}

/// Parameters for one check
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub parallelism: usize,
    pub partition: PartitionMode,
    /// Caller-owned token; cancelling it aborts the check
    pub cancel: CancelToken,
    pub timeout: Option<Duration>,
}

impl CheckOptions {
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism,
            partition: PartitionMode::default(),
            cancel: CancelToken::new(),
            timeout: None,
        }
    }

    pub fn with_partition(mut self, partition: PartitionMode) -> Self {
        self.partition = partition;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
