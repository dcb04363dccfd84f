//! # Normalize one task into a single async settlement.
//!
//! Every task settles through [`normalize`]: the adapter invokes the task,
//! panics become errors, and thunk chains are walked hop by hop until a value
//! (or error) appears. Sync and async tasks are indistinguishable to callers
//! once they pass through here.
//!
//! ## Normalization flow
//! ```text
//! normalize(adapter, task, args)
//!     │
//!     ▼
//!   adapter.apply(task, args) ── Err(e) ────────────────► Err(e)
//!     │
//!     ├─ Ok(TaskStep::Value(v)) ─────────────────────────► Ok(v)
//!     │
//!     └─ Ok(TaskStep::Thunk(next))
//!          ├─ count hop (over limit ► Err(HopsExceeded))
//!          ├─ publish ThunkScheduled { task: next, hop }
//!          └─ loop with `next` as the current task
//! ```
//!
//! ## Rules
//! - Resolves **exactly one** terminal result: `Ok(value)` or `Err(error)`
//! - Hops run strictly in sequence, never concurrently
//! - The first error anywhere in the chain rejects the whole call (no retries)
//! - `hop_limit: None` walks chains of any depth; a cyclic chain is then the
//!   caller's bug and loops forever, same as an infinite loop in the task body
//! - `hop_limit: Some(n)` allows `n` hops and fails the `n + 1`-th with
//!   [`TaskError::HopsExceeded`]

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;

use crate::error::{TaskError, panic_message};
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{TaskArgs, TaskRef, TaskStep};

/// Contract for invoking one task and settling it into a [`TaskStep`].
///
/// The adapter is the seam between the driver and the task's calling
/// convention. The default is [`CallAdapter`]; supply a custom implementation
/// through `DriverConfig::with_adapter` to intercept every invocation
/// (stubbing, tracing, fault injection).
#[async_trait]
pub trait Adapt<T, C = (), P = ()>: Send + Sync {
    /// Invokes `task` once with `args` and settles the result.
    async fn apply(
        &self,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<TaskStep<T, C, P>, TaskError>;
}

/// Default adapter: awaits `task.call` and converts panics into errors.
///
/// ### Rules
/// - `Ok(step)` / `Err(e)` from the task pass through unchanged
/// - A panic inside the task settles as [`TaskError::Panicked`] with the
///   payload message preserved
pub struct CallAdapter;

#[async_trait]
impl<T, C, P> Adapt<T, C, P> for CallAdapter
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    async fn apply(
        &self,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<TaskStep<T, C, P>, TaskError> {
        match AssertUnwindSafe(task.call(args.clone())).catch_unwind().await {
            Ok(res) => res,
            Err(panic_err) => Err(TaskError::Panicked {
                message: panic_message(panic_err),
            }),
        }
    }
}

/// Settles `task` into a single value, walking thunk hops in sequence.
///
/// ### Flow
/// 1. Invoke `adapter.apply(task, args)` for the current task
/// 2. `TaskStep::Thunk(next)`: count the hop, publish `ThunkScheduled`
///    (when `bus` is set), continue with `next`
/// 3. `TaskStep::Value(v)`: resolve with `Ok(v)`
///
/// ### Hop limit
/// `hop_limit` bounds the number of thunk indirections. `None` means
/// unbounded; `Some(n)` fails the `n + 1`-th hop with
/// [`TaskError::HopsExceeded`] before the follow-up task runs.
pub async fn normalize<T, C, P>(
    adapter: &dyn Adapt<T, C, P>,
    task: TaskRef<T, C, P>,
    args: &TaskArgs<C, P>,
    hop_limit: Option<usize>,
    bus: Option<&Bus>,
) -> Result<T, TaskError>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    let mut current = task;
    let mut hops = 0usize;

    loop {
        match adapter.apply(&current, args).await? {
            TaskStep::Value(v) => return Ok(v),
            TaskStep::Thunk(next) => {
                hops += 1;
                if let Some(limit) = hop_limit {
                    if hops > limit {
                        return Err(TaskError::HopsExceeded { limit });
                    }
                }
                if let Some(bus) = bus {
                    publish_hop(bus, next.name(), hops);
                }
                current = next;
            }
        }
    }
}

/// Publishes `ThunkScheduled` for the follow-up task.
fn publish_hop(bus: &Bus, name: &str, hop: usize) {
    bus.publish(
        Event::new(EventKind::ThunkScheduled)
            .with_task(name)
            .with_hop(hop),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tasks::{SyncFn, TaskFn};

    /// Builds a thunk chain of `depth` hops ending in `value`.
    fn chain(depth: usize, value: i32) -> TaskRef<i32> {
        if depth == 0 {
            SyncFn::arc("leaf", move |_| Ok(TaskStep::Value(value)))
        } else {
            let next = chain(depth - 1, value);
            SyncFn::arc(format!("hop-{depth}"), move |_| {
                Ok(TaskStep::Thunk(Arc::clone(&next)))
            })
        }
    }

    #[tokio::test]
    async fn test_sync_task_resolves_to_value() {
        let task: TaskRef<i32> = SyncFn::arc("seven", |_| Ok(TaskStep::Value(7)));
        let got = normalize(&CallAdapter, task, &TaskArgs::default(), None, None).await;
        assert_eq!(got, Ok(7));
    }

    #[tokio::test]
    async fn test_async_task_resolves_to_value() {
        let task: TaskRef<i32> = TaskFn::arc("eight", |_| async { Ok(TaskStep::Value(8)) });
        let got = normalize(&CallAdapter, task, &TaskArgs::default(), None, None).await;
        assert_eq!(got, Ok(8));
    }

    #[tokio::test]
    async fn test_task_error_rejects_the_call() {
        let task: TaskRef<i32> = SyncFn::arc("broken", |_| Err(TaskError::fail("no dice")));
        let got = normalize(&CallAdapter, task, &TaskArgs::default(), None, None).await;
        assert_eq!(got, Err(TaskError::fail("no dice")));
    }

    #[tokio::test]
    async fn test_async_task_error_rejects_the_call() {
        let task: TaskRef<i32> =
            TaskFn::arc("broken", |_| async { Err(TaskError::fail("late no dice")) });
        let got = normalize(&CallAdapter, task, &TaskArgs::default(), None, None).await;
        assert_eq!(got, Err(TaskError::fail("late no dice")));
    }

    #[tokio::test]
    async fn test_thunk_chain_resolves_any_depth() {
        for depth in [0usize, 1, 2, 8, 32] {
            let got = normalize(&CallAdapter, chain(depth, 42), &TaskArgs::default(), None, None)
                .await;
            assert_eq!(got, Ok(42), "depth {depth} must resolve to the leaf value");
        }
    }

    #[tokio::test]
    async fn test_hop_limit_allows_exact_depth() {
        let got =
            normalize(&CallAdapter, chain(2, 5), &TaskArgs::default(), Some(2), None).await;
        assert_eq!(got, Ok(5));
    }

    #[tokio::test]
    async fn test_hop_limit_rejects_deeper_chains() {
        let got =
            normalize(&CallAdapter, chain(3, 5), &TaskArgs::default(), Some(2), None).await;
        assert_eq!(got, Err(TaskError::HopsExceeded { limit: 2 }));
    }

    #[tokio::test]
    async fn test_task_panic_becomes_error() {
        let task: TaskRef<i32> = SyncFn::arc("grenade", |_| panic!("kaboom"));
        let got = normalize(&CallAdapter, task, &TaskArgs::default(), None, None).await;
        assert_eq!(
            got,
            Err(TaskError::Panicked {
                message: "kaboom".into()
            })
        );
    }

    #[tokio::test]
    async fn test_custom_adapter_replaces_invocation() {
        struct Canned;

        #[async_trait]
        impl Adapt<i32> for Canned {
            async fn apply(
                &self,
                _task: &TaskRef<i32>,
                _args: &TaskArgs,
            ) -> Result<TaskStep<i32>, TaskError> {
                Ok(TaskStep::Value(99))
            }
        }

        let task: TaskRef<i32> = SyncFn::arc("ignored", |_| Ok(TaskStep::Value(1)));
        let got = normalize(&Canned, task, &TaskArgs::default(), None, None).await;
        assert_eq!(got, Ok(99), "adapter output must win over the task body");
    }

    #[tokio::test]
    async fn test_thunk_hops_publish_events() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();

        let got = normalize(
            &CallAdapter,
            chain(2, 11),
            &TaskArgs::default(),
            None,
            Some(&bus),
        )
        .await;
        assert_eq!(got, Ok(11));

        let first = rx.try_recv().expect("first hop event");
        let second = rx.try_recv().expect("second hop event");
        assert_eq!(first.kind, EventKind::ThunkScheduled);
        assert_eq!(first.hop, Some(1));
        assert_eq!(first.task.as_deref(), Some("hop-1"));
        assert_eq!(second.kind, EventKind::ThunkScheduled);
        assert_eq!(second.hop, Some(2));
        assert_eq!(second.task.as_deref(), Some("leaf"));
        assert!(rx.try_recv().is_err(), "exactly one event per hop");
    }
}
