use hookline::{
    AsyncFilter, AsyncFilterPoint, Outcome,
    testing::{CallLog, Fail, Recorder},
};
use tokio::time::{Duration, sleep};

mod common;
use common::Denied;

struct Delay {
    millis: u64,
    log: CallLog,
    label: &'static str,
}

impl AsyncFilter<u64, (), Denied> for Delay {
    async fn filter(&self, state: u64, _extra: &()) -> Outcome<u64, Denied> {
        sleep(Duration::from_millis(self.millis)).await;
        self.log.record(self.label);
        Outcome::next(state + self.millis)
    }
}

#[tokio::test]
async fn test_async_filters_run_in_priority_order() {
    let log = CallLog::new();
    let point = AsyncFilterPoint::<u64, (), Denied>::named("async_order");

    point.register(
        Delay {
            millis: 1,
            log: log.clone(),
            label: "fast",
        },
        1,
    );
    point.register(
        Delay {
            millis: 20,
            log: log.clone(),
            label: "slow",
        },
        0,
    );
    point.register(Recorder::new("sync_tail", &log), 2);

    let outcome = point.apply(0, &()).await;
    assert_eq!(outcome, Outcome::next(21));
    assert_eq!(log.entries(), ["slow", "fast", "sync_tail"]);
}

#[tokio::test]
async fn test_async_halt_short_circuits() {
    let log = CallLog::new();
    let point = AsyncFilterPoint::<u64, (), Denied>::new();
    point.register(Recorder::new("h1", &log), 0);
    point.register(Fail::new("h2", &log, Denied("async")), 1);
    point.register(Recorder::new("h3", &log), 2);

    let outcome = point.apply(7, &()).await;
    assert_eq!(outcome, Outcome::halt(7, Denied("async")));
    assert_eq!(log.entries(), ["h1", "h2"]);
}

#[tokio::test]
async fn test_async_point_shared_across_tasks() {
    let point = AsyncFilterPoint::<u64, (), Denied>::new();
    let registrar = point.clone();

    let handle = tokio::spawn(async move {
        registrar.register(
            |n: u64, _: &()| async move { Outcome::next(n * 3) },
            0,
        );
    });
    handle.await.unwrap();

    assert_eq!(point.len(), 1);
    assert_eq!(point.apply(2, &()).await, Outcome::next(6));
}
