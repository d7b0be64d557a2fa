//! Rayon-backed executor

use super::{Executor, Job};
use crate::error::ExecutorError;
use tracing::warn;

/// Executor that spawns jobs onto a dedicated rayon thread pool
pub struct RayonExecutor {
    pool: ::rayon::ThreadPool,
}

impl RayonExecutor {
    pub fn new(threads: usize) -> Result<Self, ExecutorError> {
        if threads == 0 {
            return Err(ExecutorError::Build("thread count must be at least 1".into()));
        }

        let pool = ::rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("primepulse-rayon-{}", i))
            // Without a handler rayon aborts the process on a panicking spawn
            .panic_handler(|_| warn!("rayon job panicked"))
            .build()
            .map_err(|e| ExecutorError::Build(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for RayonExecutor {
    fn execute(&self, job: Job) -> Result<(), ExecutorError> {
        self.pool.spawn(job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;

    #[test]
    fn test_rayon_runs_jobs() {
        let executor = RayonExecutor::new(2).unwrap();
        assert_eq!(executor.threads(), 2);

        let (tx, rx) = channel::unbounded();
        for i in 0..10u32 {
            let tx = tx.clone();
            executor.execute(Box::new(move || tx.send(i).unwrap())).unwrap();
        }
        drop(tx);

        let mut seen: Vec<u32> = rx.iter().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_rayon_zero_threads_rejected() {
        assert!(RayonExecutor::new(0).is_err());
    }
}
