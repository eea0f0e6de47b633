/*!
Lazy, push-based notification streams.

An [`Observable`] is a definition: a producer function that is run once per
[`subscribe`](Observable::subscribe) call. The producer pushes values through a [`Subscriber`],
which forwards them to the caller's [`Observer`] until a terminal `error` or `complete` closes it.
The caller gets a [`Subscription`] back and can cancel the execution with
[`unsubscribe`](Subscription::unsubscribe). Whatever ends the execution, the [`Teardown`] the producer
registered runs exactly once.

# Guarantees
- The producer runs synchronously inside `subscribe`; values it emits before returning are seen by
  the observer before `subscribe` returns.
- At most one of `error` / `complete` reaches the observer, and no `next` ever follows it.
- Teardown runs once, right after the terminal handler or on the first `unsubscribe`, whichever
  comes first. A teardown registered after that point runs as soon as it is registered.
- `unsubscribe` never notifies the observer.
- Nothing here returns an error to the caller: late emissions, repeated unsubscribes and errors
  without an error handler are all silent no-ops.

# Deferred emissions

```rust
use observable::{Observable, Observer, Teardown};
use observable::scheduler::{Scheduler, SchedulerExt, VirtualClock};
use std::sync::{Arc, Mutex};
use std::time::Duration;

let clock = Arc::new(VirtualClock::new());
let names = {
    let clock = clock.clone();
    Observable::<&'static str, String>::new(move |subscriber| {
        subscriber.next("Mahi Chenchith");
        let timer = {
            let subscriber = subscriber.clone();
            clock.set_timeout(Duration::from_millis(2000), move || subscriber.next("Chenchu Lakshmi"))
        };
        let clock = clock.clone();
        Teardown::new(move || clock.cancel(timer))
    })
};

let log = Arc::new(Mutex::new(Vec::new()));
let subscription = {
    let log = log.clone();
    names.subscribe(Observer::<&'static str, String>::new().on_next(move |name: &'static str| log.lock().unwrap().push(name)))
};
assert_eq!(*log.lock().unwrap(), ["Mahi Chenchith"]);

clock.advance(Duration::from_millis(2000));
assert_eq!(*log.lock().unwrap(), ["Mahi Chenchith", "Chenchu Lakshmi"]);
subscription.unsubscribe();
```
*/

pub mod error;
mod notification;
mod observable;
mod observer;
pub mod scheduler;
mod subscriber;
mod subscription;

pub use error::*;
pub use notification::{Notification, NotificationKind};
pub use observable::*;
pub use observer::*;
pub use subscriber::*;
pub use subscription::*;

use std::sync::{Mutex, MutexGuard, PoisonError};

// Guarded state is plain data, so a panic in another holder leaves nothing half-updated.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }
