use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::{lock, notification::Gate};

static NEXT_SUBSCRIPTION_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identifier of one subscription, used for logging and debugging.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(usize);

impl SubscriptionId {
    fn next() -> Self { Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed)) }
}

impl From<SubscriptionId> for usize {
    fn from(id: SubscriptionId) -> Self { id.0 }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Cleanup to run when a subscription ends, whatever ended it.
///
/// Consumed when run, so it can only ever run once. `()` converts into the empty teardown,
/// which is what a producer returning nothing produces.
#[derive(Default)]
pub struct Teardown(Option<Box<dyn FnOnce() + Send + 'static>>);

impl Teardown {
    pub fn new<F>(f: F) -> Self
    where F: FnOnce() + Send + 'static {
        Self(Some(Box::new(f)))
    }

    pub fn none() -> Self { Self(None) }

    pub fn is_none(&self) -> bool { self.0.is_none() }

    pub(crate) fn run(self) {
        if let Some(f) = self.0 {
            f();
        }
    }
}

impl From<()> for Teardown {
    fn from(_: ()) -> Self { Self::none() }
}

impl From<Option<Teardown>> for Teardown {
    fn from(teardown: Option<Teardown>) -> Self { teardown.unwrap_or_default() }
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() { write!(f, "Teardown(none)") } else { write!(f, "Teardown(..)") }
    }
}

/// Why a subscription was closed. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseReason {
    Completed,
    Errored,
    Unsubscribed,
}

/// Handle to one running execution of an observable.
///
/// Cloning shares the same execution. Dropping a `Subscription` does NOT cancel anything;
/// use [`Subscription::unsubscribe`] or hold a [`SubscriptionGuard`] for that.
#[derive(Clone)]
pub struct Subscription(Arc<Inner>);

struct Inner {
    id: SubscriptionId,
    gate: Gate,
    // single-assignment slot, emptied by whichever close path runs first
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    pub(crate) fn new() -> Self { Self(Arc::new(Inner { id: SubscriptionId::next(), gate: Gate::new(), teardown: Mutex::new(None) })) }

    pub fn id(&self) -> SubscriptionId { self.0.id }

    /// Whether the execution has ended, by completion, error or unsubscribe.
    pub fn is_closed(&self) -> bool { self.0.gate.is_closed() }

    /// Cancel the execution.
    ///
    /// The first call closes the subscription and runs the registered teardown, if any. Later
    /// calls, and calls after the execution already completed or errored, do nothing. The observer
    /// is not notified.
    pub fn unsubscribe(&self) { self.close(CloseReason::Unsubscribed) }

    /// Register the teardown for this execution.
    ///
    /// If the subscription is already closed the teardown runs right away, so a late registration
    /// is never lost. The slot holds at most one teardown: if it is already occupied the new one is
    /// handed back untouched.
    pub fn set_teardown(&self, teardown: Teardown) -> Result<(), Teardown> {
        if teardown.is_none() {
            return Ok(());
        }
        {
            let mut slot = lock(&self.0.teardown);
            if !self.0.gate.is_closed() {
                if slot.is_some() {
                    return Err(teardown);
                }
                *slot = Some(teardown);
                return Ok(());
            }
        }
        debug!(subscription = %self.0.id, "teardown registered after close, running now");
        teardown.run();
        Ok(())
    }

    /// Wrap this subscription so that it is unsubscribed when the guard is dropped.
    pub fn guard(&self) -> SubscriptionGuard { SubscriptionGuard(self.clone()) }

    pub(crate) fn close(&self, reason: CloseReason) {
        if !self.0.gate.close() {
            return;
        }
        debug!(subscription = %self.0.id, ?reason, "subscription closed");
        // take before running so the lock is not held while caller code runs
        let teardown = lock(&self.0.teardown).take();
        if let Some(teardown) = teardown {
            debug!(subscription = %self.0.id, "running teardown");
            teardown.run();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.0.id).field("closed", &self.is_closed()).finish()
    }
}

/// Unsubscribes the wrapped subscription when dropped.
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
    pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) { self.0.unsubscribe(); }
}
