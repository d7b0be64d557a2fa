//! Error types for primality checks
//!
//! Library operations return these typed errors. Application code (CLI,
//! configuration, output) wraps them in `anyhow` with context.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single primality check
///
/// Any of these means the primality of the target is undetermined. None of
/// them may be read as a "prime" or "composite" verdict.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Parallelism level of zero was requested
    #[error("parallelism must be at least 1, got {0}")]
    InvalidParallelism(usize),

    /// A worker task faulted while searching its sub-range
    #[error("worker for sub-range {index} failed: {message}")]
    WorkerFailed { index: usize, message: String },

    /// The caller cancelled the check
    #[error("primality check cancelled")]
    Cancelled,

    /// The configured deadline elapsed before a verdict was reached
    #[error("primality check timed out after {0:?}")]
    TimedOut(Duration),

    /// The execution context refused a task
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl CheckError {
    /// True for outcomes caused by the caller's environment (cancel or deadline)
    /// rather than by a fault in the check itself.
    pub fn is_interruption(&self) -> bool {
        matches!(self, CheckError::Cancelled | CheckError::TimedOut(_))
    }
}

/// Failure to hand a job to an execution context
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("executor has been shut down")]
    Shutdown,

    #[error("failed to build executor: {0}")]
    Build(String),
}
