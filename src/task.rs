//! Shared Task Module
//!
//! A cancellable, shareable asynchronous computation. The result (success or
//! failure) is retained so current and future holders of a clone can all read
//! it. Dropping one clone never cancels the computation for the others; the
//! underlying tokio task is aborted only on explicit `cancel()` or when the
//! last clone is dropped.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::error::{CacheError, Result};

// == Task State ==
/// Lifecycle of a shared task.
///
/// Transitions: `Running -> Ready | Failed | Cancelled`. Terminal states
/// never change, with one exception: `replace` may swap a `Ready` value for
/// another `Ready` value.
#[derive(Debug, Clone)]
pub enum TaskState<T> {
    /// Computation still in flight
    Running,
    /// Completed successfully; value retained for all holders
    Ready(T),
    /// Completed with an error; error retained for all holders
    Failed(CacheError),
    /// Explicitly cancelled before completion
    Cancelled,
}

// == Task Core ==
/// Shared ownership core. Aborts the underlying tokio task when the last
/// clone is dropped.
#[derive(Debug)]
struct TaskCore<T> {
    state_tx: watch::Sender<TaskState<T>>,
    abort: AbortHandle,
}

impl<T> Drop for TaskCore<T> {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

// == Shared Task ==
/// Handle to a shared asynchronous computation.
///
/// Cloning is cheap and shares the same computation and result. Awaiting via
/// [`SharedTask::wait`] suspends without blocking a thread.
#[derive(Debug)]
pub struct SharedTask<T> {
    core: Arc<TaskCore<T>>,
    state_rx: watch::Receiver<TaskState<T>>,
}

impl<T> Clone for SharedTask<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            state_rx: self.state_rx.clone(),
        }
    }
}

impl<T> SharedTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Spawn ==
    /// Spawns `future` on the tokio worker pool and returns a shareable
    /// handle to its eventual result.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(TaskState::Running);
        let completion_tx = state_tx.clone();

        let join = tokio::spawn(async move {
            let outcome = future.await;
            // A task finishing after cancellation must not overwrite the
            // Cancelled state and resurrect an evicted slot.
            completion_tx.send_modify(|state| {
                if matches!(state, TaskState::Running) {
                    *state = match outcome {
                        Ok(value) => TaskState::Ready(value),
                        Err(err) => TaskState::Failed(err),
                    };
                }
            });
        });

        Self {
            core: Arc::new(TaskCore {
                state_tx,
                abort: join.abort_handle(),
            }),
            state_rx,
        }
    }

    // == Wait ==
    /// Suspends until the task reaches a terminal state, then yields its
    /// retained result. Safe to call from any number of clones, before or
    /// after completion.
    pub async fn wait(&self) -> Result<T> {
        let mut rx = self.state_rx.clone();
        let settled = rx.wait_for(|state| !matches!(state, TaskState::Running)).await;
        match settled {
            Ok(state) => match &*state {
                TaskState::Ready(value) => Ok(value.clone()),
                TaskState::Failed(err) => Err(err.clone()),
                TaskState::Cancelled => Err(CacheError::Cancelled),
                TaskState::Running => unreachable!("wait_for yielded a running state"),
            },
            // Sender gone while still running: owner tore the task down.
            Err(_) => Err(CacheError::Cancelled),
        }
    }

    // == Try Result ==
    /// Non-blocking peek at the result. `None` while still running.
    pub fn try_result(&self) -> Option<Result<T>> {
        match &*self.state_rx.borrow() {
            TaskState::Running => None,
            TaskState::Ready(value) => Some(Ok(value.clone())),
            TaskState::Failed(err) => Some(Err(err.clone())),
            TaskState::Cancelled => Some(Err(CacheError::Cancelled)),
        }
    }

    // == Cancel ==
    /// Explicitly cancels the computation.
    ///
    /// If still running, the underlying task is aborted and all waiters
    /// observe [`CacheError::Cancelled`]. A task that already settled keeps
    /// its result, so holders that obtained the handle before cancellation
    /// still read the retained value.
    pub fn cancel(&self) {
        self.core.state_tx.send_modify(|state| {
            if matches!(state, TaskState::Running) {
                *state = TaskState::Cancelled;
            }
        });
        self.core.abort.abort();
    }

    // == Replace Ready Value ==
    /// Replaces a retained `Ready` value in place.
    ///
    /// No-op (returns false) unless the task has already completed
    /// successfully. Never blocks waiting for a pending computation.
    pub fn replace_ready<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let mut replaced = false;
        self.core.state_tx.send_modify(|state| {
            if let TaskState::Ready(value) = state {
                *value = f(value);
                replaced = true;
            }
        });
        replaced
    }

    // == Is Running ==
    /// Returns true while the computation has not settled.
    pub fn is_running(&self) -> bool {
        matches!(&*self.state_rx.borrow(), TaskState::Running)
    }
}
