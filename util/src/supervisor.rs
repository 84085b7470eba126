//! Process-wide supervision of background work.
//!
//! Request handlers hand side effects that run after the response (for example
//! rating recomputation) to the [`Supervisor`]. A task that fails or panics is
//! not retried or swallowed: it is logged and the supervisor enters the failed
//! state, which the server treats as a signal to shut down and exit non-zero so
//! an external process manager can restart it.

use futures::FutureExt;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Clone, Default)]
pub struct Supervisor {
    tracker: TaskTracker,
    fatal: CancellationToken,
    reason: Arc<Mutex<Option<String>>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a tracked background task.
    pub fn spawn<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let fatal = self.fatal.clone();
        let reason = Arc::clone(&self.reason);

        self.tracker.spawn(async move {
            let failure = match AssertUnwindSafe(task).catch_unwind().await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => e.to_string(),
                Err(panic) => panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "task panicked".to_string()),
            };

            tracing::error!(task = name, error = %failure, "Background task failed; shutting down");
            if let Ok(mut guard) = reason.lock() {
                guard.get_or_insert_with(|| format!("{name}: {failure}"));
            }
            fatal.cancel();
        });
    }

    /// Waits until every task spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Resolves once a background task has failed.
    pub async fn failed(&self) {
        self.fatal.cancelled().await
    }

    pub fn is_failed(&self) -> bool {
        self.fatal.is_cancelled()
    }

    /// First failure recorded, as `"<task>: <error>"`.
    pub fn failure_reason(&self) -> Option<String> {
        self.reason.lock().ok().and_then(|g| g.clone())
    }
}
