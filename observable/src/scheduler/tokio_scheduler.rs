use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at, sleep};
use tracing::trace;

use super::{RepeatingTask, Scheduler, Task, TimerHandle, clamp_period};
use crate::{error::SchedulerError, lock};

/// A [`Scheduler`] backed by tokio timers.
///
/// Every scheduled callback is its own spawned task; cancelling aborts that task. Callbacks run on
/// whichever runtime this scheduler was created for. Dropping the last clone aborts everything that
/// is still pending.
#[derive(Clone)]
pub struct TokioScheduler(Arc<Inner>);

struct Inner {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TimerHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Use the runtime of the calling context.
    pub fn try_current() -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(Self::with_handle(runtime))
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self(Arc::new(Inner { runtime, next_id: AtomicU64::new(0), tasks: Mutex::new(HashMap::new()) }))
    }

    /// Number of callbacks that are scheduled and neither fired (one-shot) nor cancelled.
    pub fn pending(&self) -> usize { lock(&self.0.tasks).iter().filter(|(_, task)| !task.is_finished()).count() }

    fn spawn<F>(&self, make: impl FnOnce(TimerHandle, Weak<Inner>) -> F) -> TimerHandle
    where F: std::future::Future<Output = ()> + Send + 'static {
        let handle = TimerHandle(self.0.next_id.fetch_add(1, Ordering::Relaxed));
        let future = make(handle, Arc::downgrade(&self.0));
        // hold the map while spawning so a task that finishes instantly cannot miss its own entry
        let mut tasks = lock(&self.0.tasks);
        tasks.insert(handle, self.0.runtime.spawn(future));
        handle
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        self.spawn(move |handle, inner| async move {
            sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                lock(&inner.tasks).remove(&handle);
            }
            trace!(timer = %handle, "tokio timer fired");
            task();
        })
    }

    fn schedule_repeating(&self, period: Duration, mut task: RepeatingTask) -> TimerHandle {
        let period = clamp_period(period);
        self.spawn(move |handle, _| async move {
            let mut interval = interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(timer = %handle, "tokio interval ticked");
                task();
            }
        })
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = lock(&self.0.tasks).remove(&handle) {
            trace!(timer = %handle, "tokio timer cancelled");
            task.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (_, task) in lock(&self.tasks).drain() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioScheduler").field("pending", &self.pending()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerExt;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_no_runtime_is_an_error() {
        assert!(matches!(TokioScheduler::try_current(), Err(SchedulerError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_once() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        {
            let count = count.clone();
            scheduler.set_timeout(Duration::from_millis(100), move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_deadline() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let handle = {
            let count = count.clone();
            scheduler.set_timeout(Duration::from_millis(100), move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        scheduler.cancel(handle);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        scheduler.cancel(handle);
    }
}
