//! Fixed-size worker thread pool
//!
//! Threads are spawned once and pull jobs from a shared crossbeam channel.
//! Dropping the pool closes the channel, lets the threads drain whatever is
//! already queued, and joins them.

use super::{Executor, Job};
use crate::error::ExecutorError;
use crossbeam::channel::{self, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tracing::{trace, warn};

/// Thread pool executing [`Job`]s in FIFO order
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `threads` worker threads
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::Build` if `threads` is zero or the OS refuses
    /// to spawn a thread.
    pub fn new(threads: usize) -> Result<Self, ExecutorError> {
        if threads == 0 {
            return Err(ExecutorError::Build("thread count must be at least 1".into()));
        }

        let (sender, receiver) = channel::unbounded::<Job>();
        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("primepulse-worker-{}", id))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        // Keep the thread alive if a job panics
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            warn!(worker = id, "job panicked");
                        }
                    }
                    trace!(worker = id, "worker thread exiting");
                })
                .map_err(|e| ExecutorError::Build(format!("failed to spawn worker {}: {}", id, e)))?;
            handles.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            handles,
        })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.handles.len()
    }

    /// Stop accepting jobs, run what is queued, and join all threads
    pub fn shutdown(&mut self) {
        self.sender.take();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Executor for WorkerPool {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        match &self.sender {
            Some(sender) => sender.send(job).map_err(|_| ExecutorError::Shutdown),
            None => Err(ExecutorError::Shutdown),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(ExecutorError::Build(_))));
    }

    #[test]
    fn test_runs_all_jobs_before_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.threads(), 3);

        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            pool.execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_execute_after_shutdown_fails() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.shutdown();
        let result = pool.execute(Box::new(|| {}));
        assert!(matches!(result, Err(ExecutorError::Shutdown)));
    }

    #[test]
    fn test_survives_panicking_job() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(Box::new(|| panic!("job failure"))).unwrap();

        let (tx, rx) = channel::bounded(1);
        pool.execute(Box::new(move || tx.send(7u8).unwrap())).unwrap();
        assert_eq!(rx.recv().unwrap(), 7);
    }
}
