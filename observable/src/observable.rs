use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    observer::{CompleteHandler, ErrorHandler, IntoObserver, NextHandler, Observer},
    subscriber::Subscriber,
    subscription::{Subscription, Teardown},
};

type Producer<T, E> = dyn Fn(Subscriber<T, E>) -> Result<Teardown, E> + Send + Sync + 'static;

/// A lazy, re-runnable definition of a push-based stream.
///
/// Nothing happens until [`Observable::subscribe`] is called. Each call runs the producer again,
/// synchronously and from scratch, with its own [`Subscriber`] and [`Subscription`]; executions
/// never share state through the observable.
///
/// ```rust
/// use observable::{Observable, Teardown};
/// use std::sync::{Arc, Mutex};
///
/// let names = Observable::<&str, ()>::new(|subscriber| {
///     subscriber.next("Mahi Chenchith");
///     subscriber.next("Mahathi");
///     subscriber.complete();
///     Teardown::new(|| println!("Teardown"))
/// });
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let subscription = {
///     let seen = seen.clone();
///     names.subscribe(move |name: &'static str| seen.lock().unwrap().push(name))
/// };
///
/// // the producer already ran to completion before subscribe returned
/// assert_eq!(*seen.lock().unwrap(), ["Mahi Chenchith", "Mahathi"]);
/// assert!(subscription.is_closed());
/// ```
pub struct Observable<T, E>(Arc<Producer<T, E>>);

impl<T, E> Clone for Observable<T, E> {
    fn clone(&self) -> Self { Self(Arc::clone(&self.0)) }
}

impl<T: 'static, E: 'static> Observable<T, E> {
    /// Define an observable from an infallible producer.
    ///
    /// The producer may return a [`Teardown`], or `()` when there is nothing to clean up.
    pub fn new<F, R>(producer: F) -> Self
    where
        F: Fn(Subscriber<T, E>) -> R + Send + Sync + 'static,
        R: Into<Teardown> + 'static,
    {
        Self(Arc::new(move |subscriber: Subscriber<T, E>| -> Result<Teardown, E> { Ok(producer(subscriber).into()) }))
    }

    /// Define an observable whose producer can fail while it runs.
    ///
    /// An `Err` returned by the producer is delivered to the observer as an error notification
    /// instead of being returned from `subscribe`. If the subscriber was already closed by then, the
    /// error is dropped.
    pub fn try_new<F, R>(producer: F) -> Self
    where
        F: Fn(Subscriber<T, E>) -> Result<R, E> + Send + Sync + 'static,
        R: Into<Teardown> + 'static,
    {
        Self(Arc::new(move |subscriber: Subscriber<T, E>| -> Result<Teardown, E> { producer(subscriber).map(Into::into) }))
    }

    /// Start a new execution of this observable.
    ///
    /// The producer runs to the end of its synchronous part before this returns, so every value it
    /// emitted synchronously has already reached the observer. The returned subscription reflects
    /// whether that execution already ended.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where O: IntoObserver<T, E> {
        let subscription = Subscription::new();
        let subscriber = Subscriber::new(observer.into_observer(), subscription.clone());
        debug!(subscription = %subscription.id(), "subscribe");

        match (self.0)(subscriber.clone()) {
            Ok(teardown) => {
                if let Err(rejected) = subscription.set_teardown(teardown) {
                    // the producer already registered one through the subscriber's subscription
                    warn!(subscription = %subscription.id(), "producer returned a second teardown, dropping it: {rejected:?}");
                }
            }
            Err(err) => {
                if subscriber.is_closed() {
                    debug!(subscription = %subscription.id(), "producer failed after the subscriber closed, error discarded");
                }
                subscriber.error(err);
            }
        }

        subscription
    }

    /// Subscribe with individually optional handlers, passed positionally.
    ///
    /// `None` in any position means "no handler" for that notification.
    pub fn subscribe_positional(
        &self,
        next: Option<NextHandler<T>>,
        error: Option<ErrorHandler<E>>,
        complete: Option<CompleteHandler>,
    ) -> Subscription {
        self.subscribe(Observer::from_parts(next, error, complete))
    }
}

impl<T, E> std::fmt::Debug for Observable<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_struct("Observable").finish_non_exhaustive() }
}
