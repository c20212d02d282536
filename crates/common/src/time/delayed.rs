//! Cancellable one-shot delayed tasks
//!
//! A [`DelayedTask`] runs a callback once after a fixed delay unless it is
//! cancelled first. Dropping the task cancels it, so an owner that is torn
//! down never has a stale timer fire into it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A scheduled one-shot callback that can be cancelled before it fires.
///
/// The callback runs on the tokio runtime after `delay` has elapsed. If
/// [`cancel`](Self::cancel) is called first, or the task is dropped, the
/// callback never runs.
#[derive(Debug)]
pub struct DelayedTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DelayedTask {
    /// Schedule `callback` to run after `delay`.
    pub fn spawn<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                () = child.cancelled() => {}
                () = tokio::time::sleep(delay) => callback(),
            }
        });
        Self { token, handle }
    }

    /// Cancel the task; the callback will not run if it has not fired yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check whether the task has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Check whether the task has finished (fired or cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
