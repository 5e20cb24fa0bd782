//! Cancellable one-shot timer for input coalescing.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delays a task until a quiet period has elapsed.
///
/// Each `schedule` call cancels the previously scheduled task, so a burst of
/// calls within the delay window runs the payload exactly once, for the last
/// call. Dropping the debouncer cancels any pending task.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates an idle debouncer.
    pub fn new() -> Self {
        Debouncer { pending: None }
    }

    /// Schedules `task` to run after `delay`, cancelling any pending task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Cancels the pending task, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
