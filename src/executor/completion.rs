//! Completion-order result draining
//!
//! `CompletionService` submits tasks to an [`Executor`] and hands their results
//! back in the order the tasks *finish*, not the order they were submitted.
//! Every task gets its own child [`CancelToken`] under a shared batch token,
//! so the caller can cancel one task or everything still outstanding.
//!
//! A task always reports exactly once: with its value, as cancelled (it never
//! started because its token was already set), or as failed (it panicked, or
//! the executor dropped it without running it).

use super::{Executor, Job};
use crate::cancel::CancelToken;
use crate::error::ExecutorError;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Upper bound on how long `take_until` blocks between interruption checks
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<T> {
    /// The task ran to completion and produced a value
    Completed(T),
    /// The task was cancelled before it started running
    Cancelled,
    /// The task panicked or was dropped unexecuted
    Failed(String),
}

/// A finished task, tagged with its submission index
#[derive(Debug)]
pub struct Completion<T> {
    pub index: usize,
    pub outcome: TaskOutcome<T>,
}

/// Why `take_until` returned without a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeError {
    /// Every submitted task has already been taken
    Empty,
    /// The interrupt token was cancelled
    Cancelled,
    /// A deadline on the interrupt token passed
    TimedOut,
}

/// Handle to one submitted task
#[derive(Debug, Clone)]
pub struct TaskHandle {
    index: usize,
    token: CancelToken,
}

impl TaskHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Request best-effort cancellation of this task only
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Reports a task's outcome exactly once, even if the job is dropped unrun
struct Reporter<T> {
    index: usize,
    sender: Option<Sender<Completion<T>>>,
}

impl<T> Reporter<T> {
    fn report(mut self, outcome: TaskOutcome<T>) {
        if let Some(sender) = self.sender.take() {
            // The receiver is gone once the batch has been decided
            let _ = sender.send(Completion { index: self.index, outcome });
        }
    }
}

impl<T> Drop for Reporter<T> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Completion {
                index: self.index,
                outcome: TaskOutcome::Failed("task dropped before running".into()),
            });
        }
    }
}

/// Submits tasks to an executor and yields their results in completion order
///
/// Dropping the service cancels every task that is still outstanding; it does
/// not wait for them to stop.
pub struct CompletionService<'a, T> {
    executor: &'a dyn Executor,
    batch: CancelToken,
    sender: Sender<Completion<T>>,
    receiver: Receiver<Completion<T>>,
    handles: Vec<TaskHandle>,
    outstanding: usize,
}

impl<'a, T: Send + 'static> CompletionService<'a, T> {
    /// Create a service whose batch token is a child of `parent`
    pub fn new(executor: &'a dyn Executor, parent: &CancelToken) -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            executor,
            batch: parent.child(),
            sender,
            receiver,
            handles: Vec::new(),
            outstanding: 0,
        }
    }

    /// Submit a task; it receives its own cancellation token to poll
    ///
    /// # Errors
    ///
    /// Propagates the executor's refusal. A refused task is never reported.
    pub fn submit<F>(&mut self, task: F) -> Result<TaskHandle, ExecutorError>
    where
        F: FnOnce(&CancelToken) -> T + Send + 'static,
    {
        let index = self.handles.len();
        let token = self.batch.child();
        let task_token = token.clone();
        let reporter = Reporter {
            index,
            sender: Some(self.sender.clone()),
        };

        let job: Job = Box::new(move || {
            if task_token.is_cancelled() {
                reporter.report(TaskOutcome::Cancelled);
                return;
            }
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task(&task_token))) {
                Ok(value) => TaskOutcome::Completed(value),
                Err(payload) => TaskOutcome::Failed(panic_message(payload.as_ref())),
            };
            reporter.report(outcome);
        });

        self.executor.execute(job)?;

        let handle = TaskHandle { index, token };
        self.handles.push(handle.clone());
        self.outstanding += 1;
        Ok(handle)
    }

    /// Number of tasks accepted by the executor
    pub fn submitted(&self) -> usize {
        self.handles.len()
    }

    /// Number of tasks whose completion has not been taken yet
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn handles(&self) -> &[TaskHandle] {
        &self.handles
    }

    /// Block until the next task finishes
    pub fn take(&mut self) -> Result<Completion<T>, TakeError> {
        self.take_until(&CancelToken::new())
    }

    /// Block until the next task finishes or `interrupt` fires
    ///
    /// `interrupt` is polled at least every 10ms and its deadline, if any, is
    /// honoured precisely.
    pub fn take_until(&mut self, interrupt: &CancelToken) -> Result<Completion<T>, TakeError> {
        if self.outstanding == 0 {
            return Err(TakeError::Empty);
        }

        loop {
            if interrupt.is_cancelled() {
                return Err(if interrupt.deadline_passed() {
                    TakeError::TimedOut
                } else {
                    TakeError::Cancelled
                });
            }

            let wait = match interrupt.deadline() {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(POLL_INTERVAL),
                None => POLL_INTERVAL,
            };

            match self.receiver.recv_timeout(wait) {
                Ok(completion) => {
                    self.outstanding -= 1;
                    return Ok(completion);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                // The service holds a sender, so this cannot happen while it is alive
                Err(RecvTimeoutError::Disconnected) => return Err(TakeError::Empty),
            }
        }
    }

    /// Request best-effort cancellation of every outstanding task
    pub fn cancel_all(&self) {
        self.batch.cancel();
    }
}

impl<T> Drop for CompletionService<'_, T> {
    fn drop(&mut self) {
        self.batch.cancel();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::WorkerPool;
    use std::thread;

    /// Executor that silently discards every job
    struct DroppingExecutor;

    impl Executor for DroppingExecutor {
        fn execute(&self, job: Job) -> Result<(), ExecutorError> {
            drop(job);
            Ok(())
        }
    }

    #[test]
    fn test_results_arrive_in_completion_order() {
        let pool = WorkerPool::new(3).unwrap();
        let mut service = CompletionService::new(&pool, &CancelToken::new());

        let delays = [300u64, 150, 0];
        for (i, delay) in delays.into_iter().enumerate() {
            service
                .submit(move |_| {
                    thread::sleep(Duration::from_millis(delay));
                    i
                })
                .unwrap();
        }
        assert_eq!(service.submitted(), 3);

        let order: Vec<usize> = (0..3).map(|_| service.take().unwrap().index).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert_eq!(service.outstanding(), 0);
        assert_eq!(service.take().unwrap_err(), TakeError::Empty);
    }

    #[test]
    fn test_cancel_all_reaches_running_tasks() {
        let pool = WorkerPool::new(2).unwrap();
        let mut service = CompletionService::new(&pool, &CancelToken::new());

        let (started_tx, started_rx) = channel::unbounded::<()>();
        for _ in 0..2 {
            let started_tx = started_tx.clone();
            service
                .submit(move |cancel: &CancelToken| {
                    started_tx.send(()).unwrap();
                    while !cancel.is_cancelled() {
                        thread::sleep(Duration::from_millis(1));
                    }
                    "stopped"
                })
                .unwrap();
        }

        // Both tasks must be running before the batch is cancelled
        for _ in 0..2 {
            started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        service.cancel_all();
        for _ in 0..2 {
            let completion = service.take().unwrap();
            assert_eq!(completion.outcome, TaskOutcome::Completed("stopped"));
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let pool = WorkerPool::new(1).unwrap();
        let mut service = CompletionService::new(&pool, &CancelToken::new());

        // Occupy the only thread so the second task is still queued when cancelled
        let (release_tx, release_rx) = channel::bounded::<()>(0);
        service
            .submit(move |_| {
                release_rx.recv().unwrap();
                0
            })
            .unwrap();
        let queued = service.submit(|_| 1).unwrap();
        assert_eq!(queued.index(), 1);
        queued.cancel();
        assert!(queued.is_cancelled());
        release_tx.send(()).unwrap();

        let mut outcomes: Vec<(usize, TaskOutcome<i32>)> = (0..2)
            .map(|_| {
                let c = service.take().unwrap();
                (c.index, c.outcome)
            })
            .collect();
        outcomes.sort_by_key(|(i, _)| *i);
        assert_eq!(outcomes[0], (0, TaskOutcome::Completed(0)));
        assert_eq!(outcomes[1], (1, TaskOutcome::Cancelled));
    }

    #[test]
    fn test_panicking_task_reports_failure() {
        let pool = WorkerPool::new(1).unwrap();
        let mut service: CompletionService<'_, u32> =
            CompletionService::new(&pool, &CancelToken::new());
        service.submit(|_| panic!("division fault")).unwrap();

        let completion = service.take().unwrap();
        assert_eq!(completion.outcome, TaskOutcome::Failed("division fault".into()));
    }

    #[test]
    fn test_dropped_job_reports_failure() {
        let executor = DroppingExecutor;
        let mut service: CompletionService<'_, u32> =
            CompletionService::new(&executor, &CancelToken::new());
        service.submit(|_| 5).unwrap();

        let completion = service.take().unwrap();
        assert!(matches!(completion.outcome, TaskOutcome::Failed(_)));
    }

    #[test]
    fn test_take_until_interrupted() {
        let pool = WorkerPool::new(1).unwrap();
        let interrupt = CancelToken::new();
        let mut service = CompletionService::new(&pool, &interrupt);
        service
            .submit(|cancel: &CancelToken| {
                while !cancel.is_cancelled() {
                    thread::sleep(Duration::from_millis(1));
                }
            })
            .unwrap();

        interrupt.cancel();
        assert_eq!(service.take_until(&interrupt).unwrap_err(), TakeError::Cancelled);
        // The batch token is a child of the interrupt, so the task stops too
        assert!(service.handles()[0].is_cancelled());
    }

    #[test]
    fn test_take_until_deadline() {
        let pool = WorkerPool::new(1).unwrap();
        let interrupt = CancelToken::new().child_with_timeout(Duration::from_millis(30));
        let mut service = CompletionService::new(&pool, &CancelToken::new());
        let (_hold_tx, hold_rx) = channel::bounded::<()>(0);
        service
            .submit(move |_| {
                let _ = hold_rx.recv_timeout(Duration::from_secs(5));
            })
            .unwrap();

        let started = Instant::now();
        assert_eq!(service.take_until(&interrupt).unwrap_err(), TakeError::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
