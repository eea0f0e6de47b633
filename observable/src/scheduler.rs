//! Deferred callbacks for producers.
//!
//! The core never schedules anything itself. A producer that wants to emit later captures a
//! [`Scheduler`] and registers callbacks on it, and typically returns a [`Teardown`](crate::Teardown)
//! that cancels them.

use std::time::Duration;

mod virtual_clock;
pub use virtual_clock::*;

#[cfg(feature = "tokio")]
mod tokio_scheduler;
#[cfg(feature = "tokio")]
pub use tokio_scheduler::*;

/// A one-shot deferred callback.
pub type Task = Box<dyn FnOnce() + Send + 'static>;
/// A callback fired once per period until cancelled.
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

/// Opaque handle to a scheduled callback, used to cancel it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "timer#{}", self.0) }
}

/// A time-based callback facility.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Run `task` every `period`, first after one full period. A zero period is treated as
    /// [`MIN_PERIOD`].
    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TimerHandle;

    /// Stop a scheduled callback. Unknown, fired or already cancelled handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

/// Smallest period a repeating callback may have.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

pub(crate) fn clamp_period(period: Duration) -> Duration { period.max(MIN_PERIOD) }

/// Closure-friendly helpers over any [`Scheduler`].
pub trait SchedulerExt: Scheduler {
    fn set_timeout<F>(&self, delay: Duration, f: F) -> TimerHandle
    where F: FnOnce() + Send + 'static {
        self.schedule(delay, Box::new(f))
    }

    fn set_interval<F>(&self, period: Duration, f: F) -> TimerHandle
    where F: FnMut() + Send + 'static {
        self.schedule_repeating(period, Box::new(f))
    }
}

impl<S: Scheduler + ?Sized> SchedulerExt for S {}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle { (**self).schedule(delay, task) }

    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TimerHandle { (**self).schedule_repeating(period, task) }

    fn cancel(&self, handle: TimerHandle) { (**self).cancel(handle) }
}
