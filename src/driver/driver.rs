//! # The per-task driver produced from a configuration.
//!
//! [`Driver`] turns one [`TaskRef`] at a time into a single async settlement,
//! running hooks around it and routing failures according to the configured
//! mode. Aggregate semantics (series, parallel) belong to the `futures`
//! combinator applying the driver, not to the driver itself.
//!
//! ## Pipeline per task
//! ```text
//! run(task)
//!     │
//!     ├─ publish TaskStarting
//!     ▼
//! before_each ──Err(e)──────────────────────────┐
//!     │                                         ▼
//!     ▼                                    (task skipped)
//! normalize(adapter, task) ──Err(e)──► on_error(e) ──► after_each(Err(e))
//!     │                                                      │
//!     ▼                                                      ├─ publish TaskFailed
//! after_each(Ok(v))                                          │
//!     │                                                      ├─ settle:
//!     ├─ publish TaskStopped                                 │    publish ErrorCaptured
//!     ▼                                                      │    resolve Ok(Failed(e))
//! resolve Ok(Value(v))                                       └─ fail-fast:
//!                                                                 resolve Err(e)
//! ```
//!
//! ## Rules
//! - The returned future resolves **exactly once** per task, regardless of
//!   thunk hops or failure mode
//! - A hook error is folded into the settlement (last error wins); a failing
//!   `after_each` turns a successful run into a failure
//! - Settle mode routes the **final** settlement: the captured error reaches
//!   the caller unmodified inside [`Outcome::Failed`]
//! - Success looks identical in both modes: `Ok(Outcome::Value(v))`
//!
//! ## Example
//! ```rust
//! use taskdriver::{Driver, DriverConfig, Outcome, SyncFn, TaskError, TaskRef, TaskStep};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let driver: Driver<i32> = Driver::new(DriverConfig::default().with_settle(true));
//!
//!     let ok: TaskRef<i32> = SyncFn::arc("ok", |_| Ok(TaskStep::Value(1)));
//!     let bad: TaskRef<i32> = SyncFn::arc("bad", |_| Err(TaskError::fail("oops")));
//!
//!     assert_eq!(driver.run(ok).await?, Outcome::Value(1));
//!     assert!(matches!(driver.run(bad).await?, Outcome::Failed(_)));
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::driver::config::DriverConfig;
use crate::driver::outcome::Outcome;
use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::hooks::Hooks;
use crate::norm::{Adapt, CallAdapter, normalize};
use crate::tasks::{TaskArgs, TaskRef};

/// Drives tasks through hooks, normalization, and failure routing.
///
/// A driver is built once from a [`DriverConfig`] and applied once per task
/// (see [`run`](Driver::run) / [`to_fn`](Driver::to_fn)). Deriving a variant
/// with different options goes through [`with`](Driver::with), which merges
/// instead of replacing.
pub struct Driver<T, C = (), P = ()> {
    cfg: DriverConfig<T, C, P>,
    args: TaskArgs<C, P>,
    adapter: Arc<dyn Adapt<T, C, P>>,
    hooks: Hooks<T, C, P>,
}

impl<T, C, P> Driver<T, C, P>
where
    T: Send + 'static,
    C: Default + Send + Sync + 'static,
    P: Default + Send + Sync + 'static,
{
    /// Builds a driver, defaulting unset context/params slots.
    ///
    /// `cfg.context` / `cfg.params` fall back to `Default::default()`. Use
    /// [`Driver::with_args`] when the environment types have no `Default`.
    pub fn new(cfg: DriverConfig<T, C, P>) -> Self {
        let context = cfg.context.clone().unwrap_or_default();
        let params = cfg.params.clone().unwrap_or_default();
        Self::assemble(cfg, TaskArgs::new(context, params))
    }
}

impl<T, C, P> Driver<T, C, P>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Builds a driver around an explicit environment.
    ///
    /// `args` wins over `cfg.context` / `cfg.params` and is recorded into the
    /// configuration so that [`with`](Driver::with) propagates it.
    pub fn with_args(mut cfg: DriverConfig<T, C, P>, args: TaskArgs<C, P>) -> Self {
        cfg.context = Some(Arc::clone(&args.context));
        cfg.params = Some(Arc::clone(&args.params));
        Self::assemble(cfg, args)
    }

    /// Derives a new driver with `overrides` merged over this configuration.
    ///
    /// Field-by-field: an option set in `overrides` wins, everything else is
    /// inherited (hooks, settle mode, environment, adapter, hop limit, bus).
    pub fn with(&self, overrides: DriverConfig<T, C, P>) -> Self {
        let merged = overrides.merge(&self.cfg);
        let context = merged
            .context
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.args.context));
        let params = merged
            .params
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.args.params));
        Self::assemble(merged, TaskArgs::new(context, params))
    }

    /// Resolved configuration backing this driver.
    pub fn config(&self) -> &DriverConfig<T, C, P> {
        &self.cfg
    }

    /// Environment handed to every task, hook, and adapter call.
    pub fn args(&self) -> &TaskArgs<C, P> {
        &self.args
    }

    /// Drives one task to settlement.
    ///
    /// ### Flow
    /// 1. Publish `TaskStarting` (when a bus is configured)
    /// 2. Await `before_each`; its error skips the task and settles below
    /// 3. Normalize the task (thunk hops walked in sequence)
    /// 4. Failure: await `on_error`, then `after_each` with the error;
    ///    success: await `after_each` with the value
    /// 5. Publish the terminal event and route: settle mode captures failures
    ///    as `Ok(Outcome::Failed(e))`, fail-fast returns `Err(e)`
    pub async fn run(&self, task: TaskRef<T, C, P>) -> Result<Outcome<T>, TaskError> {
        self.publish_starting(&task);

        let settled = match self.hooks.run_before_each(&task, &self.args).await {
            Ok(()) => {
                normalize(
                    self.adapter.as_ref(),
                    Arc::clone(&task),
                    &self.args,
                    self.cfg.hop_limit(),
                    self.cfg.bus.as_ref(),
                )
                .await
            }
            Err(e) => Err(e),
        };

        let settled = match settled {
            Ok(v) => Ok(v),
            Err(e) => match self.hooks.run_error(&e, &task, &self.args).await {
                Ok(()) => Err(e),
                Err(hook_err) => Err(hook_err),
            },
        };

        let settled = match settled {
            Ok(v) => match self.hooks.run_after_each(Ok(&v), &task, &self.args).await {
                Ok(()) => Ok(v),
                Err(hook_err) => Err(hook_err),
            },
            Err(e) => match self.hooks.run_after_each(Err(&e), &task, &self.args).await {
                Ok(()) => Err(e),
                Err(hook_err) => Err(hook_err),
            },
        };

        match settled {
            Ok(v) => {
                self.publish_stopped(&task);
                Ok(Outcome::Value(v))
            }
            Err(e) => {
                self.publish_failed(&task, &e);
                if self.cfg.settle() {
                    self.publish_captured(&task, &e);
                    Ok(Outcome::Failed(e))
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Returns the driver as a cloneable closure for `futures` combinators.
    ///
    /// The closure owns a clone of this driver, so it outlives `self` and fits
    /// `StreamExt::then`, `TryStreamExt` adapters, and `future::try_join_all`.
    pub fn to_fn(
        &self,
    ) -> impl Fn(TaskRef<T, C, P>) -> BoxFuture<'static, Result<Outcome<T>, TaskError>> + Clone
    where
        T: Sync,
    {
        let driver = self.clone();
        move |task| {
            let driver = driver.clone();
            async move { driver.run(task).await }.boxed()
        }
    }

    fn assemble(cfg: DriverConfig<T, C, P>, args: TaskArgs<C, P>) -> Self {
        let adapter = cfg
            .adapter
            .clone()
            .unwrap_or_else(|| Arc::new(CallAdapter));
        let hooks = Hooks {
            before: cfg.before_each.clone(),
            after: cfg.after_each.clone(),
            error: cfg.on_error.clone(),
        };
        Self {
            cfg,
            args,
            adapter,
            hooks,
        }
    }

    /// Publishes `TaskStarting` with the task's name and kind.
    fn publish_starting(&self, task: &TaskRef<T, C, P>) {
        if let Some(bus) = &self.cfg.bus {
            bus.publish(
                Event::new(EventKind::TaskStarting)
                    .with_task(task.name())
                    .with_task_kind(task.kind()),
            );
        }
    }

    /// Publishes `TaskStopped` (value settlement).
    fn publish_stopped(&self, task: &TaskRef<T, C, P>) {
        if let Some(bus) = &self.cfg.bus {
            bus.publish(Event::new(EventKind::TaskStopped).with_task(task.name()));
        }
    }

    /// Publishes `TaskFailed` with the error message.
    fn publish_failed(&self, task: &TaskRef<T, C, P>, err: &TaskError) {
        if let Some(bus) = &self.cfg.bus {
            bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(task.name())
                    .with_reason(err.to_string()),
            );
        }
    }

    /// Publishes `ErrorCaptured` (settle mode only).
    fn publish_captured(&self, task: &TaskRef<T, C, P>, err: &TaskError) {
        if let Some(bus) = &self.cfg.bus {
            bus.publish(
                Event::new(EventKind::ErrorCaptured)
                    .with_task(task.name())
                    .with_reason(err.to_string()),
            );
        }
    }
}

impl<T, C, P> Default for Driver<T, C, P>
where
    T: Send + 'static,
    C: Default + Send + Sync + 'static,
    P: Default + Send + Sync + 'static,
{
    /// A driver over the empty configuration: fail-fast, no hooks, no bus.
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

impl<T, C, P> Clone for Driver<T, C, P> {
    fn clone(&self) -> Self {
        Self {
            cfg: self.cfg.clone(),
            args: self.args.clone(),
            adapter: Arc::clone(&self.adapter),
            hooks: self.hooks.clone(),
        }
    }
}
