#![cfg(feature = "tokio")]

mod common;

use common::Recorder;
use observable::scheduler::{Scheduler, SchedulerExt, TokioScheduler};
use observable::{Observable, Teardown};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tokio_test::assert_ok;

#[tokio::test(start_paused = true)]
async fn test_interval_cancelled_by_unsubscribe() {
    let scheduler = assert_ok!(TokioScheduler::try_current());
    let log = Recorder::new();
    let clears = Arc::new(AtomicUsize::new(0));

    let interval = {
        let (scheduler, log, clears) = (scheduler.clone(), log.clone(), clears.clone());
        Observable::<u32, String>::new(move |subscriber| {
            let mut counter = 1;
            let log = log.clone();
            let handle = scheduler.set_interval(Duration::from_millis(2000), move || {
                log.push(format!("Emitted {counter}"));
                subscriber.next(counter);
                counter += 1;
            });
            let (scheduler, clears) = (scheduler.clone(), clears.clone());
            Teardown::new(move || {
                clears.fetch_add(1, Ordering::SeqCst);
                scheduler.cancel(handle);
            })
        })
    };

    let subscription = {
        let log = log.clone();
        interval.subscribe(move |value: u32| log.push(value.to_string()))
    };

    sleep(Duration::from_millis(7000)).await;
    log.push("Unsubscribe");
    subscription.unsubscribe();
    sleep(Duration::from_millis(10_000)).await;

    assert_eq!(log.take(), ["Emitted 1", "1", "Emitted 2", "2", "Emitted 3", "3", "Unsubscribe"]);
    assert_eq!(clears.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_error_then_late_emissions() {
    let scheduler = assert_ok!(TokioScheduler::try_current());
    let log = Recorder::new();

    let observable = {
        let (scheduler, log) = (scheduler.clone(), log.clone());
        Observable::<&'static str, String>::new(move |subscriber| {
            subscriber.next("Mahi Chenchith");
            {
                let subscriber = subscriber.clone();
                scheduler.set_timeout(Duration::from_millis(2000), move || subscriber.error("Failure".to_string()));
            }
            scheduler.set_timeout(Duration::from_millis(4000), move || {
                subscriber.next("Chenchu Lakshmi");
                subscriber.complete();
            });
            log.teardown()
        })
    };

    let subscription = observable.subscribe(log.observer());
    sleep(Duration::from_millis(5000)).await;

    assert!(subscription.is_closed());
    assert_eq!(log.take(), ["next Mahi Chenchith", "error Failure", "teardown"]);
}
