//! Fixed-interval autosave.
//!
//! [`AutosaveTimer`] runs a background task that invokes a tick callback
//! once per period until cancelled. Each window owns at most one timer,
//! alive only while the window is open and not minimized. Ticks are
//! best-effort: a stalled runtime simply delays them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a running autosave task. Dropping it stops the task.
#[derive(Debug)]
pub struct AutosaveTimer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutosaveTimer {
    /// Start ticking every `period`, first tick one full period from now.
    ///
    /// Returns `None` when called outside a tokio runtime; autosave is then
    /// skipped rather than failing the window.
    pub fn start<F>(period: Duration, tick: F) -> Option<Self>
    where
        F: Fn() + Send + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No async runtime available, autosave disabled");
                return None;
            }
        };

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = interval.tick() => tick(),
                }
            }
        });

        Some(Self { cancel, handle })
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutosaveTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Let the spawned task observe time changes.
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_without_immediate_tick() {
        let (count, tick) = counter();
        let _timer = AutosaveTimer::start(Duration::from_secs(30), tick).unwrap();

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_stops_ticks() {
        let (count, tick) = counter();
        let timer = AutosaveTimer::start(Duration::from_secs(30), tick).unwrap();
        timer.stop();

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn outside_runtime_returns_none() {
        let (_, tick) = counter();
        assert!(AutosaveTimer::start(Duration::from_secs(1), tick).is_none());
    }
}
