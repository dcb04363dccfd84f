//! # Lifecycle hooks fired around each task settlement.
//!
//! Hooks observe and steer the driver pipeline:
//! - [`BeforeEach`] runs before the task is invoked
//! - [`OnError`] runs when the task settles with an error (before `AfterEach`)
//! - [`AfterEach`] runs after every settlement, success or failure
//!
//! Each hook is optional. The [`Hooks`] bundle dispatches to whichever hooks
//! are present; an absent hook is a no-op.
//!
//! ## Hook flow
//! ```text
//! before_each(task, args)
//!     │
//!     ▼
//!   task settles
//!     │
//!     ├─ Ok(v)  ─────────────────────────────► after_each(Ok(&v), ..)
//!     │
//!     └─ Err(e) ──► on_error(&e, ..) ────────► after_each(Err(&e), ..)
//! ```
//!
//! ## Rules
//! - Hooks are awaited to completion; a hook defers settlement simply by not
//!   finishing its future yet
//! - Hook errors are not swallowed: the driver folds them into the settlement
//!   (last error wins)
//! - Implement the traits directly to borrow the settled value; the `*Fn`
//!   adapters hand plain closures owned clones instead
//!
//! ## Example
//! ```rust
//! use taskdriver::{BeforeFn, Hooks, TaskRef};
//!
//! let mut hooks: Hooks<i32> = Hooks::default();
//! hooks.before = Some(BeforeFn::arc(|task: TaskRef<i32>, _args| async move {
//!     println!("starting {}", task.name());
//!     Ok(())
//! }));
//! assert!(hooks.before.is_some());
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::{TaskArgs, TaskRef};

/// Borrowed view of one settlement: exactly one of value or error.
pub type Settlement<'a, T> = Result<&'a T, &'a TaskError>;

/// Hook fired before each task is invoked.
#[async_trait]
pub trait BeforeEach<T, C = (), P = ()>: Send + Sync {
    /// Runs before `task` is handed to the adapter.
    ///
    /// An `Err` skips the task and enters the settlement path with that error.
    async fn call(&self, task: &TaskRef<T, C, P>, args: &TaskArgs<C, P>) -> Result<(), TaskError>;
}

/// Hook fired after each settlement, success or failure.
#[async_trait]
pub trait AfterEach<T, C = (), P = ()>: Send + Sync {
    /// Runs once the task has settled; `settled` holds the value or the error.
    ///
    /// An `Err` replaces the settlement error (or fails a successful run).
    async fn call(
        &self,
        settled: Settlement<'_, T>,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError>;
}

/// Hook fired when a task settles with an error, before [`AfterEach`].
#[async_trait]
pub trait OnError<T, C = (), P = ()>: Send + Sync {
    /// Runs with the settlement error.
    ///
    /// An `Err` replaces the settlement error.
    async fn call(
        &self,
        error: &TaskError,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError>;
}

/// Closure-backed [`BeforeEach`] hook.
///
/// The closure receives an owned `TaskRef` and `TaskArgs` clone per call.
pub struct BeforeFn<F> {
    f: F,
}

impl<F> BeforeFn<F> {
    /// Creates a new before-each hook from a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates a reference-counted before-each hook.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, C, P, F, Fut> BeforeEach<T, C, P> for BeforeFn<F>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(TaskRef<T, C, P>, TaskArgs<C, P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn call(&self, task: &TaskRef<T, C, P>, args: &TaskArgs<C, P>) -> Result<(), TaskError> {
        (self.f)(Arc::clone(task), args.clone()).await
    }
}

/// Closure-backed [`AfterEach`] hook.
///
/// The closure receives the settlement as an owned `Result<T, TaskError>`,
/// which is what requires `T: Clone` here; implement [`AfterEach`] directly
/// to borrow instead.
pub struct AfterFn<F> {
    f: F,
}

impl<F> AfterFn<F> {
    /// Creates a new after-each hook from a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates a reference-counted after-each hook.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, C, P, F, Fut> AfterEach<T, C, P> for AfterFn<F>
where
    T: Clone + Send + Sync + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(Result<T, TaskError>, TaskRef<T, C, P>, TaskArgs<C, P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn call(
        &self,
        settled: Settlement<'_, T>,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError> {
        let owned = settled.map(|v| v.clone()).map_err(|e| e.clone());
        (self.f)(owned, Arc::clone(task), args.clone()).await
    }
}

/// Closure-backed [`OnError`] hook.
///
/// The closure receives an owned clone of the settlement error.
pub struct ErrorFn<F> {
    f: F,
}

impl<F> ErrorFn<F> {
    /// Creates a new error hook from a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates a reference-counted error hook.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<T, C, P, F, Fut> OnError<T, C, P> for ErrorFn<F>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(TaskError, TaskRef<T, C, P>, TaskArgs<C, P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    async fn call(
        &self,
        error: &TaskError,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError> {
        (self.f)(error.clone(), Arc::clone(task), args.clone()).await
    }
}

/// Optional hook bundle dispatched by the driver.
///
/// Every slot is independent; an unset slot dispatches to nothing and
/// returns `Ok(())`.
pub struct Hooks<T, C = (), P = ()> {
    /// Runs before each task.
    pub before: Option<Arc<dyn BeforeEach<T, C, P>>>,
    /// Runs after each settlement.
    pub after: Option<Arc<dyn AfterEach<T, C, P>>>,
    /// Runs on each error settlement.
    pub error: Option<Arc<dyn OnError<T, C, P>>>,
}

impl<T, C, P> Hooks<T, C, P>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    /// Awaits the configured [`BeforeEach`] hook; no-op when absent.
    pub async fn run_before_each(
        &self,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError> {
        match &self.before {
            Some(hook) => hook.call(task, args).await,
            None => Ok(()),
        }
    }

    /// Awaits the configured [`AfterEach`] hook; no-op when absent.
    pub async fn run_after_each(
        &self,
        settled: Settlement<'_, T>,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError> {
        match &self.after {
            Some(hook) => hook.call(settled, task, args).await,
            None => Ok(()),
        }
    }

    /// Awaits the configured [`OnError`] hook; no-op when absent.
    pub async fn run_error(
        &self,
        error: &TaskError,
        task: &TaskRef<T, C, P>,
        args: &TaskArgs<C, P>,
    ) -> Result<(), TaskError> {
        match &self.error {
            Some(hook) => hook.call(error, task, args).await,
            None => Ok(()),
        }
    }
}

impl<T, C, P> Default for Hooks<T, C, P> {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
            error: None,
        }
    }
}

impl<T, C, P> Clone for Hooks<T, C, P> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::tasks::{SyncFn, TaskStep};

    type Log = Mutex<Vec<String>>;

    fn task() -> TaskRef<i32, Log> {
        SyncFn::arc("probe", |_: TaskArgs<Log>| Ok(TaskStep::Value(0)))
    }

    fn args() -> TaskArgs<Log> {
        TaskArgs::new(Arc::new(Mutex::new(Vec::new())), Arc::new(()))
    }

    #[tokio::test]
    async fn test_absent_hooks_are_noops() {
        let hooks: Hooks<i32, Log> = Hooks::default();
        let (task, args) = (task(), args());

        assert_eq!(hooks.run_before_each(&task, &args).await, Ok(()));
        assert_eq!(hooks.run_after_each(Ok(&1), &task, &args).await, Ok(()));
        assert_eq!(
            hooks.run_error(&TaskError::fail("x"), &task, &args).await,
            Ok(())
        );
        assert!(args.context().lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_before_fn_sees_the_task() {
        let mut hooks: Hooks<i32, Log> = Hooks::default();
        hooks.before = Some(BeforeFn::arc(
            |task: TaskRef<i32, Log>, args: TaskArgs<Log>| async move {
                args.context()
                    .lock()
                    .unwrap()
                    .push(format!("before {}", task.name()));
                Ok(())
            },
        ));

        let (task, args) = (task(), args());
        hooks.run_before_each(&task, &args).await.unwrap();
        assert_eq!(
            *args.context().lock().unwrap(),
            vec!["before probe".to_string()]
        );
    }

    #[tokio::test]
    async fn test_after_fn_receives_owned_settlement() {
        let mut hooks: Hooks<i32, Log> = Hooks::default();
        hooks.after = Some(AfterFn::arc(
            |settled: Result<i32, TaskError>, _task, args: TaskArgs<Log>| async move {
                args.context().lock().unwrap().push(format!("{settled:?}"));
                Ok(())
            },
        ));

        let (task, args) = (task(), args());
        hooks.run_after_each(Ok(&5), &task, &args).await.unwrap();
        hooks
            .run_after_each(Err(&TaskError::fail("boom")), &task, &args)
            .await
            .unwrap();

        let log = args.context().lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log[0].contains("Ok(5)"), "got {:?}", log[0]);
        assert!(log[1].contains("boom"), "got {:?}", log[1]);
    }

    #[tokio::test]
    async fn test_error_fn_receives_error_clone() {
        let mut hooks: Hooks<i32, Log> = Hooks::default();
        hooks.error = Some(ErrorFn::arc(
            |err: TaskError, _task, args: TaskArgs<Log>| async move {
                args.context().lock().unwrap().push(err.to_string());
                Ok(())
            },
        ));

        let (task, args) = (task(), args());
        hooks
            .run_error(&TaskError::fail("wat"), &task, &args)
            .await
            .unwrap();
        assert_eq!(
            *args.context().lock().unwrap(),
            vec!["execution failed: wat".to_string()]
        );
    }

    #[tokio::test]
    async fn test_hook_error_propagates() {
        let mut hooks: Hooks<i32, Log> = Hooks::default();
        hooks.before = Some(BeforeFn::arc(|_task, _args| async {
            Err(TaskError::fail("stop right there"))
        }));

        let (task, args) = (task(), args());
        assert_eq!(
            hooks.run_before_each(&task, &args).await,
            Err(TaskError::fail("stop right there"))
        );
    }
}
