//! Check task scheduling
//!
//! Tasks run on the tokio runtime the scheduler was created on. There is no
//! cancellation: a superseded task still runs and exits through the sequence
//! guard in [`Checker::run`].

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use super::check::Checker;
use super::types::{CheckTask, MonitorError, Timing};

/// Spawns check tasks and drains them on shutdown
pub struct CheckScheduler {
    handle: Handle,
    tracker: TaskTracker,
    checker: Arc<Checker>,
}

impl CheckScheduler {
    pub fn new(handle: Handle, checker: Arc<Checker>) -> Self {
        Self {
            handle,
            tracker: TaskTracker::new(),
            checker,
        }
    }

    /// Dispatch according to the task's timing
    pub fn schedule(&self, task: CheckTask) {
        match task.timing {
            Timing::Deferred(delay) => self.run_after(task, delay),
            Timing::Immediate => self.run_now(task),
        }
    }

    /// Run `task` once `delay` has elapsed
    pub fn run_after(&self, task: CheckTask, delay: Duration) {
        let checker = Arc::clone(&self.checker);
        self.tracker.spawn_on(
            async move {
                tokio::time::sleep(delay).await;
                checker.run(&task);
            },
            &self.handle,
        );
    }

    /// Run `task` as soon as a worker is free
    pub fn run_now(&self, task: CheckTask) {
        let checker = Arc::clone(&self.checker);
        self.tracker.spawn_on(
            async move {
                checker.run(&task);
            },
            &self.handle,
        );
    }

    /// Tasks spawned and not yet finished
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every spawned task, scheduled or running, to finish
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), MonitorError> {
        self.tracker.close();
        tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .map_err(|_| MonitorError::ShutdownTimedOut { timeout })
    }
}
