use std::time::Duration;

use anyhow::anyhow;
use observable::scheduler::{Scheduler, SchedulerExt, TokioScheduler};
use observable::{Observable, Observer, Teardown};
use tokio::time::sleep;

pub const TITLES: [&str; 7] = [
    "empty observable",
    "synchronous emission",
    "asynchronous emission",
    "complete notification and teardown",
    "error notification",
    "emissions after the subscription ended",
    "cancellation with unsubscribe",
];

/// Run example `number` (1-based). Unknown numbers do nothing.
pub async fn run(number: usize, scheduler: TokioScheduler) {
    match number {
        1 => empty(scheduler).await,
        2 => synchronous(scheduler).await,
        3 => asynchronous(scheduler).await,
        4 => complete_and_teardown(scheduler).await,
        5 => error_notification(scheduler).await,
        6 => after_error(scheduler).await,
        7 => cancellation(scheduler).await,
        _ => {}
    }
}

fn ms(n: u64) -> Duration { Duration::from_millis(n) }

fn printing_observer() -> Observer<&'static str, anyhow::Error> {
    Observer::new()
        .on_next(|value: &'static str| println!("{value}"))
        .on_error(|err: anyhow::Error| println!("{err}"))
        .on_complete(|| println!("Subscription completed!"))
}

async fn empty(_: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(|_| println!("Observable Executed!"));

    println!("Before Subscribe");
    observable.subscribe(Observer::<&'static str, anyhow::Error>::new());
    println!("After Subscribe");
}

async fn synchronous(_: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(|subscriber| {
        println!("Observable Executed!");
        subscriber.next("Mahi Chenchith");
    });

    println!("Before Subscribe");
    observable.subscribe(|value: &'static str| println!("{value}"));
    println!("After Subscribe");
}

async fn asynchronous(scheduler: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(move |subscriber| {
        println!("Observable Executed!");
        subscriber.next("Mahi Chenchith");
        subscriber.next("Mahathi");
        scheduler.set_timeout(ms(2000), move || subscriber.next("Chenchu Lakshmi"));
    });

    println!("Before Subscribe");
    observable.subscribe(|value: &'static str| println!("{value}"));
    println!("After Subscribe");
    sleep(ms(2100)).await;
}

async fn complete_and_teardown(scheduler: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(move |subscriber| {
        println!("Observable Executed!");
        subscriber.next("Mahi Chenchith");
        subscriber.next("Mahathi");
        scheduler.set_timeout(ms(2000), move || {
            subscriber.next("Chenchu Lakshmi");
            subscriber.complete();
        });
        Teardown::new(|| println!("Teardown"))
    });

    println!("Before Subscribe");
    // positional form, with no error handler
    observable.subscribe_positional(
        Some(Box::new(|value: &'static str| println!("{value}"))),
        None,
        Some(Box::new(|| println!("Subscription completed!"))),
    );
    println!("After Subscribe");
    sleep(ms(2100)).await;
}

async fn error_notification(scheduler: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(move |subscriber| {
        println!("Observable Executed!");
        subscriber.next("Mahi Chenchith");
        subscriber.next("Mahathi");
        {
            let subscriber = subscriber.clone();
            scheduler.set_timeout(ms(2000), move || subscriber.next("Chenchu Lakshmi"));
        }
        scheduler.set_timeout(ms(4000), move || subscriber.error(anyhow!("Failure")));
        Teardown::new(|| println!("Teardown"))
    });

    println!("Before Subscribe");
    observable.subscribe(printing_observer());
    println!("After Subscribe");
    sleep(ms(4100)).await;
}

async fn after_error(scheduler: TokioScheduler) {
    let observable = Observable::<&'static str, anyhow::Error>::new(move |subscriber| {
        println!("Observable Executed!");
        subscriber.next("Mahi Chenchith");
        subscriber.next("Mahathi");
        {
            let subscriber = subscriber.clone();
            scheduler.set_timeout(ms(2000), move || subscriber.error(anyhow!("Failure")));
        }
        scheduler.set_timeout(ms(4000), move || {
            subscriber.next("Chenchu Lakshmi");
            subscriber.complete();
        });
        Teardown::new(|| println!("Teardown"))
    });

    println!("Before Subscribe");
    observable.subscribe(printing_observer());
    println!("After Subscribe");
    sleep(ms(4100)).await;
}

async fn cancellation(scheduler: TokioScheduler) {
    let interval = {
        let scheduler = scheduler.clone();
        Observable::<u32, anyhow::Error>::new(move |subscriber| {
            let mut counter = 1;
            let handle = scheduler.set_interval(ms(2000), move || {
                println!("Emitted {counter}");
                subscriber.next(counter);
                counter += 1;
            });
            let scheduler = scheduler.clone();
            Teardown::new(move || scheduler.cancel(handle))
        })
    };

    let subscription = interval.subscribe(|value: u32| println!("{value}"));
    scheduler.set_timeout(ms(7000), move || {
        println!("Unsubscribe");
        subscription.unsubscribe();
    });
    sleep(ms(9000)).await;
}
