use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::{
    lock,
    notification::{Gate, Notification},
    observer::{CompleteHandler, ErrorHandler, NextHandler, Observer},
    subscription::{CloseReason, Subscription},
};

/// The producer's side of one subscription.
///
/// A `Subscriber` sits between the producer and the caller's [`Observer`] and forwards only what
/// the observer is still allowed to see: any number of `next` values, then at most one `error` or
/// `complete`. Anything emitted after that, or after the caller unsubscribed, is dropped silently.
///
/// Clones refer to the same subscription, so a producer can move copies into deferred callbacks.
pub struct Subscriber<T, E>(Arc<Inner<T, E>>);

struct Inner<T, E> {
    gate: Gate,
    next: Option<NextHandler<T>>,
    error: Mutex<Option<ErrorHandler<E>>>,
    complete: Mutex<Option<CompleteHandler>>,
    subscription: Subscription,
}

impl<T, E> Clone for Subscriber<T, E> {
    fn clone(&self) -> Self { Self(Arc::clone(&self.0)) }
}

impl<T, E> Subscriber<T, E> {
    pub(crate) fn new(observer: Observer<T, E>, subscription: Subscription) -> Self {
        let Observer { next, error, complete } = observer;
        Self(Arc::new(Inner { gate: Gate::new(), next, error: Mutex::new(error), complete: Mutex::new(complete), subscription }))
    }

    /// True once a terminal notification went through or the subscription was cancelled.
    pub fn is_closed(&self) -> bool { self.0.gate.is_closed() || self.0.subscription.is_closed() }

    /// The subscription this subscriber feeds.
    pub fn subscription(&self) -> &Subscription { &self.0.subscription }

    pub fn next(&self, value: T) {
        if self.is_closed() {
            trace!(subscription = %self.0.subscription.id(), "next dropped: subscriber closed");
            return;
        }
        trace!(subscription = %self.0.subscription.id(), "next");
        if let Some(next) = &self.0.next {
            next(value);
        }
    }

    pub fn error(&self, err: E) {
        if !self.terminate() {
            trace!(subscription = %self.0.subscription.id(), "error dropped: subscriber closed");
            return;
        }
        drop(lock(&self.0.complete).take());
        let handler = lock(&self.0.error).take();
        match handler {
            Some(handler) => handler(err),
            None => debug!(subscription = %self.0.subscription.id(), "error swallowed: observer has no error handler"),
        }
        self.0.subscription.close(CloseReason::Errored);
    }

    pub fn complete(&self) {
        if !self.terminate() {
            trace!(subscription = %self.0.subscription.id(), "complete dropped: subscriber closed");
            return;
        }
        drop(lock(&self.0.error).take());
        let handler = lock(&self.0.complete).take();
        if let Some(handler) = handler {
            handler();
        }
        self.0.subscription.close(CloseReason::Completed);
    }

    /// Route a notification value to `next`, `error` or `complete`.
    pub fn notify(&self, notification: Notification<T, E>) {
        match notification {
            Notification::Next(value) => self.next(value),
            Notification::Error(err) => self.error(err),
            Notification::Complete => self.complete(),
        }
    }

    // Claims the single terminal slot. False if already closed by any path.
    fn terminate(&self) -> bool {
        if self.0.subscription.is_closed() {
            return false;
        }
        let won = self.0.gate.close();
        if won {
            debug!(subscription = %self.0.subscription.id(), "terminal notification");
        }
        won
    }
}

impl<T, E> std::fmt::Debug for Subscriber<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("subscription", &self.0.subscription.id()).field("closed", &self.is_closed()).finish()
    }
}
