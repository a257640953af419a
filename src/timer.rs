//! Timers for the page: trailing-edge debounce and one-shot timeouts.
//!
//! Timers are queued on a [`TimerQueue`] and only run while the queue is
//! driven with [`TimerQueue::advance`]. Queuing never needs a runtime, so
//! events can be dispatched anywhere; without one the timers simply stay
//! pending. Actions run on the driving thread and may freely borrow the
//! shared document.

use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinHandle, LocalSet};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::trace;

/// Local task set holding a page's pending timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    tasks: LocalSet,
}

impl TimerQueue {
    pub fn new() -> Self {
        TimerQueue::default()
    }

    /// Run `action` once, `delay` from now.
    pub fn set_timeout<F>(&self, delay: Duration, action: F) -> JoinHandle<()>
    where
        F: FnOnce() + 'static,
    {
        let deadline = Instant::now() + delay;
        self.tasks.spawn_local(async move {
            sleep_until(deadline).await;
            action();
        })
    }

    /// Let `duration` pass, running every timer that comes due meanwhile.
    ///
    /// Must be awaited on a current-thread tokio runtime.
    pub async fn advance(&self, duration: Duration) {
        self.tasks.run_until(sleep(duration)).await;
    }

    /// Drive `future` to completion while running due timers.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.tasks.run_until(future).await
    }
}

/// Owns a single cancellable timer; every `schedule` call replaces the
/// pending one, so only the action scheduled last runs, `delay` after the
/// last call.
#[derive(Debug, Default)]
pub struct Debouncer {
    name: &'static str,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(name: &'static str) -> Self {
        Debouncer {
            name,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, timers: &TimerQueue, delay: Duration, action: F)
    where
        F: FnOnce() + 'static,
    {
        if let Some(previous) = self.pending.take() {
            if !previous.is_finished() {
                trace!("{}: superseding pending timer", self.name);
            }
            previous.abort();
        }
        self.pending = Some(timers.set_timeout(delay, action));
    }

    /// Whether an action is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
