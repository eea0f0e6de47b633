use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use tracing::trace;

use super::{RepeatingTask, Scheduler, Task, TimerHandle, clamp_period};
use crate::lock;

/// A manually driven clock for deterministic tests.
///
/// Time only moves when [`VirtualClock::advance`] (or one of its variants) is called. Due timers
/// fire in deadline order, ties in the order they were scheduled, and each runs to completion
/// before the next one starts. Callbacks run without any internal lock held, so they may
/// schedule and cancel freely; a timer cancelled by an earlier callback never fires.
#[derive(Default)]
pub struct VirtualClock(Mutex<State>);

#[derive(Default)]
struct State {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), Entry>,
    index: HashMap<TimerHandle, (Duration, u64)>,
    // repeating timer currently being run, cleared if it cancels itself
    firing: Option<TimerHandle>,
}

struct Entry {
    handle: TimerHandle,
    job: Job,
}

enum Job {
    Once(Task),
    Every { period: Duration, task: RepeatingTask },
}

impl State {
    fn insert(&mut self, handle: TimerHandle, deadline: Duration, job: Job) {
        let key = (deadline, self.next_seq);
        self.next_seq += 1;
        self.timers.insert(key, Entry { handle, job });
        self.index.insert(handle, key);
    }

    fn pop_due(&mut self, target: Duration) -> Option<(Duration, Entry)> {
        let (&key, _) = self.timers.first_key_value().filter(|((deadline, _), _)| *deadline <= target)?;
        let entry = self.timers.remove(&key)?;
        self.index.remove(&entry.handle);
        Some((key.0, entry))
    }
}

impl VirtualClock {
    pub fn new() -> Self { Self::default() }

    /// Virtual time elapsed since the clock was created.
    pub fn now(&self) -> Duration { lock(&self.0).now }

    /// Number of timers still scheduled.
    pub fn pending(&self) -> usize { lock(&self.0).timers.len() }

    /// Move time forward by `by`, firing every timer that falls due on the way.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.advance_to(target);
    }

    /// Move time forward to `target`, firing every timer due at or before it.
    ///
    /// Moving backwards is not possible; an earlier `target` only fires timers that are already due.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let (deadline, entry) = {
                let mut state = lock(&self.0);
                let Some((deadline, entry)) = state.pop_due(target) else { break };
                state.now = state.now.max(deadline);
                (deadline, entry)
            };
            trace!(timer = %entry.handle, at = ?deadline, "virtual timer fired");
            match entry.job {
                Job::Once(task) => task(),
                Job::Every { period, mut task } => {
                    lock(&self.0).firing = Some(entry.handle);
                    task();
                    let mut state = lock(&self.0);
                    if state.firing.take() == Some(entry.handle) {
                        state.insert(entry.handle, deadline + period, Job::Every { period, task });
                    }
                }
            }
        }
        let mut state = lock(&self.0);
        state.now = state.now.max(target);
    }

    /// Fire one-shot timers in deadline order until none are left. Repeating timers fire along the
    /// way but do not keep the clock running on their own.
    pub fn run_until_idle(&self) {
        loop {
            let next_once = {
                let state = lock(&self.0);
                state.timers.iter().find(|(_, entry)| matches!(entry.job, Job::Once(_))).map(|((deadline, _), _)| *deadline)
            };
            match next_once {
                Some(deadline) => self.advance_to(deadline),
                None => break,
            }
        }
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut state = lock(&self.0);
        let handle = TimerHandle(state.next_seq);
        let deadline = state.now + delay;
        state.insert(handle, deadline, Job::Once(task));
        handle
    }

    fn schedule_repeating(&self, period: Duration, task: RepeatingTask) -> TimerHandle {
        let period = clamp_period(period);
        let mut state = lock(&self.0);
        let handle = TimerHandle(state.next_seq);
        let deadline = state.now + period;
        state.insert(handle, deadline, Job::Every { period, task });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut state = lock(&self.0);
        if state.firing == Some(handle) {
            state.firing = None;
        }
        if let Some(key) = state.index.remove(&handle) {
            state.timers.remove(&key);
            trace!(timer = %handle, "virtual timer cancelled");
        }
    }
}

impl std::fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.0);
        f.debug_struct("VirtualClock").field("now", &state.now).field("pending", &state.timers.len()).finish()
    }
}
