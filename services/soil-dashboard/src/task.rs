//! Owned periodic tasks
//!
//! A [`ScheduledTask`] runs an async body on a fixed period until its
//! cancellation token fires. The handle owns the timer: dropping it cancels
//! the task, and [`ScheduledTask::stop`] additionally waits for the task to
//! exit. A tick still waiting when the token fires is dropped at its next
//! await point.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a periodic task spawned on the tokio runtime
#[derive(Debug)]
pub struct ScheduledTask {
    name: &'static str,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Spawn `tick` every `period`, first firing one period from now.
    ///
    /// The task runs under a child of `parent`, so cancelling the parent
    /// stops it as well. Ticks never overlap: a slow tick delays the next
    /// one and missed ticks are skipped.
    pub fn spawn<F, Fut>(
        name: &'static str,
        period: Duration,
        parent: &CancellationToken,
        mut tick: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = parent.child_token();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if task_cancel.is_cancelled() {
                    break;
                }
                tokio::select! {
                    biased;
                    _ = tick() => {}
                    _ = task_cancel.cancelled() => break,
                }
            }
            tracing::debug!("Scheduled task '{}' stopped", name);
        });

        tracing::debug!("Scheduled task '{}' every {:?}", name, period);

        Self {
            name,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the timer and wait until the task has exited
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Scheduled task '{}' ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
