//! Cancellable timer tasks.
//!
//! Each logical stream owns one [`ScheduledTask`]. Cancelling sends on the
//! task's token and then awaits the task, so once [`ScheduledTask::cancel`]
//! returns no tick of that stream can run again.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

/// Handle to a spawned timer.
pub struct ScheduledTask {
    name: &'static str,
    cancel: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Run `tick` every `period`, first after one full period.
    pub fn periodic<F>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancelled => break,
                    _ = ticker.tick() => tick(),
                }
            }
            debug!("{} timer stopped", name);
        });

        debug!("{} timer started ({:?})", name, period);
        Self {
            name,
            cancel: Some(cancel),
            handle: Some(handle),
        }
    }

    /// Run `fire` once after `delay`.
    pub fn once<F>(name: &'static str, delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (cancel, cancelled) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled => {}
                _ = sleep(delay) => fire(),
            }
        });

        Self {
            name,
            cancel: Some(cancel),
            handle: Some(handle),
        }
    }

    /// Whether the task body has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Signal the task and wait for it to exit.
    pub async fn cancel(mut self) {
        debug!("Cancelling {} timer", self.name);
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        // Dropped without cancel(): stop at the next poll.
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_periodic_first_tick_after_one_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let task = ScheduledTask::periodic("test", Duration::from_millis(1000), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let task = ScheduledTask::periodic("test", Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(250)).await;
        task.cancel().await;
        let seen = count.load(Ordering::SeqCst);
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_once_and_can_be_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let task = ScheduledTask::once("once", Duration::from_millis(1000), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.is_finished());
        task.cancel().await;

        let counter = count.clone();
        let task = ScheduledTask::once("once", Duration::from_millis(1000), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel().await;
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
