//! Hooks, a shared context, and event subscribers around one driven batch.
//!
//! Every task runs between a before/after hook pair that talks to shared
//! counters, while two subscribers watch the same run over the bus.
//!
//! Run with: `cargo run --example hooks` (add `--features logging` for the
//! built-in writer).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};

use taskdriver::{
    AfterFn, BeforeFn, Bus, Driver, DriverConfig, ErrorFn, Event, Outcome, Subscribe, SyncFn,
    TaskArgs, TaskError, TaskFn, TaskRef, TaskStep,
};

/// Counters shared with every task and hook through the driver context.
#[derive(Default)]
struct Stats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

/// Minimal subscriber: one line per event.
struct Tracer;

#[async_trait]
impl Subscribe for Tracer {
    async fn on_event(&self, event: &Event) {
        if let Some(task) = &event.task {
            println!(
                "[trace] seq={} kind={:?} task={task}",
                event.seq, event.kind
            );
        }
    }

    fn name(&self) -> &'static str {
        "tracer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new(64);
    let tracer = bus.attach(Arc::new(Tracer));
    #[cfg(feature = "logging")]
    let writer = bus.attach(Arc::new(taskdriver::LogWriter));

    let cfg = DriverConfig::default()
        .with_settle(true)
        .with_max_hops(8)
        .with_bus(bus.clone())
        .with_before_each(BeforeFn::arc(
            |task: TaskRef<u32, Stats>, _args| async move {
                println!("[hook] before {}", task.name());
                Ok(())
            },
        ))
        .with_on_error(ErrorFn::arc(
            |err: TaskError, task: TaskRef<u32, Stats>, args: TaskArgs<Stats>| async move {
                args.context().failed.fetch_add(1, Ordering::Relaxed);
                println!("[hook] error {}: {err}", task.name());
                Ok(())
            },
        ))
        .with_after_each(AfterFn::arc(
            |settled: Result<u32, TaskError>,
             task: TaskRef<u32, Stats>,
             args: TaskArgs<Stats>| async move {
                if settled.is_ok() {
                    args.context().completed.fetch_add(1, Ordering::Relaxed);
                }
                println!("[hook] after {}", task.name());
                Ok(())
            },
        ));

    let stats = Arc::new(Stats::default());
    let driver = Driver::with_args(cfg, TaskArgs::new(Arc::clone(&stats), Arc::new(())));

    let tasks: Vec<TaskRef<u32, Stats>> = vec![
        TaskFn::arc("fetch", |_| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(TaskStep::Value(2))
        }),
        SyncFn::arc("parse", |_| Ok(TaskStep::Value(40))),
        SyncFn::arc("flaky", |_| Err(TaskError::fail("upstream unavailable"))),
    ];

    let outcomes: Vec<Outcome<u32>> = stream::iter(tasks)
        .then(|t| driver.run(t))
        .try_collect()
        .await?;

    for outcome in &outcomes {
        match outcome {
            Outcome::Value(v) => println!("[main] value {v}"),
            Outcome::Failed(e) => println!("[main] captured {e}"),
        }
    }
    println!(
        "[main] completed={} failed={}",
        stats.completed.load(Ordering::Relaxed),
        stats.failed.load(Ordering::Relaxed)
    );

    // Drop every bus handle so the workers see the channel close, then join.
    drop(driver);
    drop(bus);
    tracer.await?;
    #[cfg(feature = "logging")]
    writer.await?;
    Ok(())
}
