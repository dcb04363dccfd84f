//! # Function-backed tasks (`TaskFn`, `SyncFn`)
//!
//! The two explicit constructors for the two calling conventions:
//!
//! - [`TaskFn`] wraps `F: Fn(TaskArgs) -> Fut`, producing a fresh future per
//!   invocation ([`TaskKind::Async`]). This is the home for anything that
//!   suspends: I/O, timers, channel waits.
//! - [`SyncFn`] wraps `F: Fn(TaskArgs) -> Result<TaskStep, TaskError>`,
//!   resolving without suspension ([`TaskKind::Sync`]).
//!
//! Either body may resolve to [`TaskStep::Thunk`] to chain into another
//! task. Each invocation creates fresh state; shared state goes through the
//! driver context (`TaskArgs::context`) or an explicit `Arc` captured by the
//! closure.
//!
//! ## Example
//! ```
//! use taskdriver::{SyncFn, TaskFn, TaskError, TaskRef, TaskStep};
//!
//! let sync_one: TaskRef<i32> = SyncFn::arc("one", |_args| Ok(TaskStep::Value(1)));
//!
//! let async_two: TaskRef<i32> = TaskFn::arc("two", |_args| async {
//!     Ok::<_, TaskError>(TaskStep::Value(2))
//! });
//!
//! assert_eq!(sync_one.name(), "one");
//! assert_eq!(async_two.name(), "two");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::task::{Task, TaskArgs, TaskKind, TaskStep};

/// Future-backed task implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new future-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a
    /// [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    ///
    /// ## Example
    /// ```
    /// use taskdriver::{TaskFn, TaskError, TaskRef, TaskStep};
    ///
    /// let t: TaskRef<i32> = TaskFn::arc("hello", |_args| async {
    ///     Ok::<_, TaskError>(TaskStep::Value(7))
    /// });
    /// assert_eq!(t.name(), "hello");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, C, P, F, Fut> Task<T, C, P> for TaskFn<F>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(TaskArgs<C, P>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<TaskStep<T, C, P>, TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Async
    }

    async fn call(&self, args: TaskArgs<C, P>) -> Result<TaskStep<T, C, P>, TaskError> {
        (self.f)(args).await
    }
}

/// Synchronous task implementation.
///
/// The body runs to completion without suspension; a plain `return` or `Err`
/// settles the invocation immediately.
pub struct SyncFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncFn<F> {
    /// Creates a new synchronous task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    ///
    /// ## Example
    /// ```
    /// use taskdriver::{SyncFn, TaskRef, TaskStep};
    ///
    /// let t: TaskRef<i32> = SyncFn::arc("three", |_args| Ok(TaskStep::Value(3)));
    /// assert_eq!(t.name(), "three");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, C, P, F> Task<T, C, P> for SyncFn<F>
where
    T: Send + 'static,
    C: Send + Sync + 'static,
    P: Send + Sync + 'static,
    F: Fn(TaskArgs<C, P>) -> Result<TaskStep<T, C, P>, TaskError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Sync
    }

    async fn call(&self, args: TaskArgs<C, P>) -> Result<TaskStep<T, C, P>, TaskError> {
        (self.f)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::task::TaskRef;

    #[tokio::test]
    async fn test_sync_fn_resolves_immediately() {
        let t: TaskRef<i32> = SyncFn::arc("one", |_args| Ok(TaskStep::Value(1)));
        assert_eq!(t.kind(), TaskKind::Sync);

        let step = t.call(TaskArgs::default()).await.unwrap();
        assert!(matches!(step, TaskStep::Value(1)));
    }

    #[tokio::test]
    async fn test_task_fn_resolves_future() {
        let t: TaskRef<i32> = TaskFn::arc("two", |_args| async {
            Ok::<_, TaskError>(TaskStep::Value(2))
        });
        assert_eq!(t.kind(), TaskKind::Async);

        let step = t.call(TaskArgs::default()).await.unwrap();
        assert!(matches!(step, TaskStep::Value(2)));
    }

    #[tokio::test]
    async fn test_sync_fn_error_settles() {
        let t: TaskRef<i32> = SyncFn::arc("bad", |_args| Err(TaskError::fail("two err")));
        let err = t.call(TaskArgs::default()).await.unwrap_err();
        assert_eq!(err, TaskError::fail("two err"));
    }

    #[tokio::test]
    async fn test_thunk_step_carries_next_task() {
        let inner: TaskRef<i32> = SyncFn::arc("inner", |_args| Ok(TaskStep::Value(9)));
        let outer: TaskRef<i32> = SyncFn::arc("outer", move |_args| {
            Ok(TaskStep::Thunk(Arc::clone(&inner)))
        });

        let step = outer.call(TaskArgs::default()).await.unwrap();
        match step {
            TaskStep::Thunk(next) => assert_eq!(next.name(), "inner"),
            TaskStep::Value(_) => panic!("expected a thunk"),
        }
    }

    #[tokio::test]
    async fn test_tasks_read_context_and_params() {
        let args: TaskArgs<String, Vec<u32>> = TaskArgs::new(
            Arc::new("shared".to_string()),
            Arc::new(vec![10, 20]),
        );
        let t: TaskRef<u32, String, Vec<u32>> = SyncFn::arc("sum", |args: TaskArgs<String, Vec<u32>>| {
            assert_eq!(args.context(), "shared");
            let total: u32 = args.params().iter().sum();
            Ok(TaskStep::Value(total))
        });

        let step = t.call(args).await.unwrap();
        assert!(matches!(step, TaskStep::Value(30)));
    }
}
