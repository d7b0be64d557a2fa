//! Execution contexts
//!
//! The primality coordinator never creates threads itself. It hands jobs to an
//! [`Executor`] supplied by the caller and drains their results through a
//! [`CompletionService`], which yields them in the order they finish.
//!
//! Two backends ship with the crate:
//! - [`WorkerPool`]: fixed set of named threads fed from a crossbeam channel
//! - [`RayonExecutor`]: adapter over a dedicated `rayon::ThreadPool`

pub mod completion;
pub mod pool;
pub mod rayon;

pub use completion::{Completion, CompletionService, TakeError, TaskHandle, TaskOutcome};
pub use pool::WorkerPool;
pub use self::rayon::RayonExecutor;

use crate::config::{ExecutorBackend, ExecutorConfig};
use crate::error::ExecutorError;
use std::sync::Arc;

/// A unit of work accepted by an executor
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs independent jobs, usually on other threads
///
/// Implementations must eventually run (or drop) every accepted job. Dropping
/// a job without running it is reported to the `CompletionService` as a task
/// failure, so a check can never hang on a lost job.
pub trait Executor: Send + Sync {
    /// Queue a job for execution
    fn execute(&self, job: Job) -> Result<(), ExecutorError>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        (**self).execute(job)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        (**self).execute(job)
    }
}

/// Build the executor described by the configuration
pub fn from_config(config: &ExecutorConfig) -> Result<Box<dyn Executor>, ExecutorError> {
    match config.backend {
        ExecutorBackend::Pool => Ok(Box::new(WorkerPool::new(config.threads)?)),
        ExecutorBackend::Rayon => Ok(Box::new(RayonExecutor::new(config.threads)?)),
    }
}
