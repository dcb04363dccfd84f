//! Drive one batch of tasks through settle and fail-fast pipelines.
//!
//! Shows the three ways to apply a driver (series, derived fail-fast series,
//! parallel) plus the guarded completion callback.
//!
//! Run with: `cargo run --example pipeline`

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};

use taskdriver::{
    Driver, DriverConfig, Outcome, SyncFn, TaskError, TaskFn, TaskRef, TaskStep, done_callback,
};

fn double_task() -> TaskRef<u32> {
    SyncFn::arc("double", |_| Ok(TaskStep::Value(42)))
}

fn slow_task() -> TaskRef<u32> {
    TaskFn::arc("slow", |_| async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(TaskStep::Value(7))
    })
}

fn flaky_task() -> TaskRef<u32> {
    SyncFn::arc("flaky", |_| Err(TaskError::fail("upstream unavailable")))
}

/// Thunk chain of `n` hops ending in `0`.
fn countdown(n: u32) -> TaskRef<u32> {
    if n == 0 {
        return SyncFn::arc("countdown-done", |_| Ok(TaskStep::Value(0)));
    }
    let next = countdown(n - 1);
    SyncFn::arc(format!("countdown-{n}"), move |_| {
        Ok(TaskStep::Thunk(Arc::clone(&next)))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settle mode: failures ride the result stream as outcomes.
    let driver: Driver<u32> =
        Driver::new(DriverConfig::default().with_settle(true).with_max_hops(16));

    let batch = vec![double_task(), slow_task(), flaky_task(), countdown(3)];
    let outcomes: Vec<Outcome<u32>> = stream::iter(batch)
        .then(|t| driver.run(t))
        .try_collect()
        .await?;
    for outcome in &outcomes {
        match outcome {
            Outcome::Value(v) => println!("[series] value {v}"),
            Outcome::Failed(e) => println!("[series] captured {e}"),
        }
    }

    // Fail-fast derivation: the first failure stops the series.
    let strict = driver.with(DriverConfig::default().with_settle(false));
    let run: Result<Vec<Outcome<u32>>, TaskError> =
        stream::iter(vec![double_task(), flaky_task(), slow_task()])
            .then(|t| strict.run(t))
            .try_collect()
            .await;
    match run {
        Ok(_) => println!("[strict] settled everything"),
        Err(e) => println!("[strict] stopped early: {e}"),
    }

    // Parallel: one driver closure, one future per task.
    let settle = driver.to_fn();
    let parallel = try_join_all(vec![
        settle(double_task()),
        settle(slow_task()),
        settle(countdown(2)),
    ])
    .await?;
    println!("[parallel] {} outcomes", parallel.len());

    // Guarded completion callback: errors and panics both reach `done`.
    let total: u32 = outcomes.iter().filter_map(|o| o.value().copied()).sum();
    let report = done_callback(
        |sum: u32| {
            println!("[report] settled sum {sum}");
            Ok(())
        },
        |err| match err {
            None => println!("[report] delivered"),
            Some(e) => println!("[report] failed: {e}"),
        },
    );
    report(total);

    Ok(())
}
