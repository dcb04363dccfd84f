//! # taskdriver
//!
//! **Taskdriver** is a lightweight task settlement library for Rust.
//!
//! It provides primitives to define, normalize, and observe async tasks
//! with configurable hooks. The crate is designed as a building block
//! for higher-level pipelines and runners.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskRef    │   │   TaskRef    │   │   TaskRef    │
//!     │(user task #1)│   │(user task #2)│   │(user task #3)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Driver (settlement pipeline)                                     │
//! │  - DriverConfig (hooks, settle mode, hop limit, bus)              │
//! │  - TaskArgs (shared context + per-run params)                     │
//! │  - CallAdapter (invokes tasks, turns panics into errors)          │
//! │  - Hooks (before_each / after_each / on_error)                    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │  run(task)   │   │  run(task)   │   │  run(task)   │   │
//!     │ (thunk loop) │   │ (thunk loop) │   │ (thunk loop) │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │                  │                  │                 │
//!      │ Publishes        │ Publishes        │ Publishes       │
//!      │ Events:          │ Events:          │ Events:         │
//!      │ - TaskStarting   │ - TaskStarting   │ - TaskStarting  │
//!      │ - TaskStopped    │ - ThunkScheduled │ - TaskFailed    │
//!      │                  │ - TaskStopped    │ - ErrorCaptured │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                (attach via DriverConfig::with_bus)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                         ┌──────────────────┐
//!                         │   Bus::attach    │
//!                         │ (one worker per  │
//!                         │   subscriber)    │
//!                         └───┬──────────┬───┘
//!                             ▼          ▼
//!                          worker1    workerN
//!                             ▼          ▼
//!                         sub1.on_   subN.on_
//!                          event()    event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! TaskRef ──► Driver::run(task)
//!
//! run(task) {
//!   ├─► publish TaskStarting{ task, kind }
//!   ├─► before_each(task, args)
//!   │       └─ Err ──► task body is skipped, settlement = Err
//!   ├─► normalize(task, args)          (only if before_each passed)
//!   │       │
//!   │       loop {
//!   │         ├─► call the task through the adapter
//!   │         │     (a panic becomes TaskError::Panicked)
//!   │         ├─ TaskStep::Value(v)    ─► settlement = Ok(v), break
//!   │         └─ TaskStep::Thunk(next) ─► hop += 1
//!   │              ├─ hop > max_hops   ─► settlement = Err(HopsExceeded), break
//!   │              └─ publish ThunkScheduled{ task: next, hop }, continue
//!   │       }
//!   │
//!   ├─► on_error(err, task, args)           (Err settlements only; hook Err replaces err)
//!   ├─► after_each(settlement, task, args)  (always; hook Err replaces the settlement)
//!   │
//!   ├─ Ok(v)  ──► publish TaskStopped ─► Ok(Outcome::Value(v))
//!   └─ Err(e) ──► publish TaskFailed
//!        ├─ settle = false ─► return Err(e)
//!        └─ settle = true  ─► publish ErrorCaptured ─► Ok(Outcome::Failed(e))
//! }
//! ```
//!
//! ## Features
//! | Area               | Description                                                         | Key types / traits                        |
//! |--------------------|---------------------------------------------------------------------|-------------------------------------------|
//! | **Tasks**          | Define tasks as async or blocking functions, composable via thunks. | [`TaskRef`], [`TaskFn`], [`SyncFn`]       |
//! | **Normalization**  | Settle any task shape into a plain value through one loop.          | [`Adapt`], [`CallAdapter`], [`normalize`] |
//! | **Hooks**          | Run setup, teardown, and error callbacks around every task.         | [`Hooks`], [`BeforeEach`], [`AfterEach`]  |
//! | **Driving**        | Run tasks through the full pipeline, one at a time or in batches.   | [`Driver`], [`DriverConfig`], [`Outcome`] |
//! | **Subscriber API** | Hook into pipeline events (logging, metrics, custom subscribers).   | [`Subscribe`], [`Bus`], [`Event`]         |
//! | **Errors**         | Typed errors for failures, panics, and runaway thunk chains.        | [`TaskError`]                             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskdriver::{Driver, DriverConfig, SyncFn, TaskFn, TaskRef, TaskStep};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Tasks settle to a value or chain into a follow-up task.
//!     let fallback: TaskRef<String> = SyncFn::arc("fallback", |_args| {
//!         Ok(TaskStep::Value("hello from the fallback".to_string()))
//!     });
//!     let greet: TaskRef<String> = TaskFn::arc("greet", move |_args| {
//!         let next = Arc::clone(&fallback);
//!         async move { Ok(TaskStep::Thunk(next)) }
//!     });
//!
//!     // The driver runs hooks, follows thunks, and reports the settlement.
//!     let driver: Driver<String> = Driver::new(DriverConfig::default());
//!     let outcome = driver.run(greet).await?;
//!     println!("{:?}", outcome.value());
//!     Ok(())
//! }
//! ```
mod driver;
mod error;
mod events;
mod guard;
mod hooks;
mod norm;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use driver::{Driver, DriverConfig, Outcome};
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use guard::done_callback;
pub use hooks::{AfterEach, AfterFn, BeforeEach, BeforeFn, ErrorFn, Hooks, OnError, Settlement};
pub use norm::{Adapt, CallAdapter, normalize};
pub use subscribers::Subscribe;
pub use tasks::{SyncFn, Task, TaskArgs, TaskFn, TaskKind, TaskRef, TaskStep};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
