//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (named, async, thunk-capable) and
//! the supporting data model: [`TaskKind`] (the declared calling convention),
//! [`TaskStep`] (what one invocation resolves to), and [`TaskArgs`] (the
//! shared invocation environment). The common handle type is [`TaskRef`],
//! an `Arc<dyn Task>` suitable for sharing across drivers and hooks.
//!
//! A task resolves to either a final value or *another task* to invoke next
//! (a thunk). The driver keeps invoking until a value appears; see
//! [`normalize`](crate::normalize).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;

/// Declared calling convention of a task.
///
/// The convention is a static property of the task constructor
/// ([`SyncFn`](crate::SyncFn) vs [`TaskFn`](crate::TaskFn)), not something
/// probed at run time. It is carried on lifecycle events so observers can
/// tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// The task body returns immediately, without suspension points.
    Sync,
    /// The task body is a future and may suspend.
    Async,
}

impl TaskKind {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskKind::Sync => "sync",
            TaskKind::Async => "async",
        }
    }
}

/// # Invocation environment handed to every task, hook, and adapter call.
///
/// Bundles the shared execution context `C` with the driver's fixed extra
/// parameters `P`. Both default to `()`. Cloning is cheap (two `Arc`s).
///
/// The context is shared across all invocations of one driver; mutation is
/// opt-in via interior mutability inside `C` and is **not** synchronized by
/// this crate. When tasks are driven in parallel, treat context mutation as
/// racy.
pub struct TaskArgs<C = (), P = ()> {
    pub(crate) context: Arc<C>,
    pub(crate) params: Arc<P>,
}

impl<C, P> TaskArgs<C, P> {
    /// Creates the environment from explicit parts.
    pub fn new(context: Arc<C>, params: Arc<P>) -> Self {
        Self { context, params }
    }

    /// Returns the shared execution context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Returns the fixed extra parameters.
    pub fn params(&self) -> &P {
        &self.params
    }
}

impl<C: Default, P: Default> Default for TaskArgs<C, P> {
    /// An empty environment: `C::default()` context, `P::default()` params.
    fn default() -> Self {
        Self {
            context: Arc::new(C::default()),
            params: Arc::new(P::default()),
        }
    }
}

impl<C, P> Clone for TaskArgs<C, P> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            params: Arc::clone(&self.params),
        }
    }
}

/// What one task invocation resolves to.
///
/// `Value` terminates the chain; `Thunk` hands back another task that the
/// driver invokes next, with the same environment.
pub enum TaskStep<T, C = (), P = ()> {
    /// Terminal value; the chain is done.
    Value(T),
    /// Another task to invoke next (thunk indirection).
    Thunk(TaskRef<T, C, P>),
}

impl<T, C, P> TaskStep<T, C, P> {
    /// True if this step terminates the chain.
    pub fn is_value(&self) -> bool {
        matches!(self, TaskStep::Value(_))
    }
}

impl<T: fmt::Debug, C, P> fmt::Debug for TaskStep<T, C, P> {
    /// Renders `Thunk` by the follow-up task's name; the task object itself
    /// is opaque.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStep::Value(v) => f.debug_tuple("Value").field(v).finish(),
            TaskStep::Thunk(next) => f.debug_tuple("Thunk").field(&next.name()).finish(),
        }
    }
}

/// Shared handle to a task.
pub type TaskRef<T, C = (), P = ()> = Arc<dyn Task<T, C, P>>;

/// # A named unit of work.
///
/// A `Task` has a stable [`name`](Task::name), a declared
/// [`kind`](Task::kind), and an async [`call`](Task::call) that resolves to
/// a [`TaskStep`]: either a final value or the next task of a thunk chain.
///
/// Most code uses the function-backed constructors
/// ([`TaskFn`](crate::TaskFn), [`SyncFn`](crate::SyncFn)) instead of
/// implementing this trait by hand.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskdriver::{Task, TaskArgs, TaskError, TaskKind, TaskStep};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Task<i32> for Demo {
///     fn name(&self) -> &str {
///         "demo"
///     }
///
///     async fn call(&self, _args: TaskArgs) -> Result<TaskStep<i32>, TaskError> {
///         Ok(TaskStep::Value(42))
///     }
/// }
///
/// assert_eq!(Demo.name(), "demo");
/// assert_eq!(Demo.kind(), TaskKind::Async);
/// ```
#[async_trait]
pub trait Task<T, C = (), P = ()>: Send + Sync {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Returns the declared calling convention.
    fn kind(&self) -> TaskKind {
        TaskKind::Async
    }

    /// Executes the task once, resolving to a value or the next thunk.
    ///
    /// Errors reject the whole chain; there are no retries here.
    async fn call(&self, args: TaskArgs<C, P>) -> Result<TaskStep<T, C, P>, TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_is_empty_env() {
        let args: TaskArgs = TaskArgs::default();
        assert_eq!(*args.context(), ());
        assert_eq!(*args.params(), ());
    }

    #[test]
    fn test_args_clone_shares_context() {
        let args: TaskArgs<std::sync::Mutex<u32>> =
            TaskArgs::new(Arc::new(std::sync::Mutex::new(0)), Arc::new(()));
        let other = args.clone();
        *other.context().lock().unwrap() += 5;
        assert_eq!(*args.context().lock().unwrap(), 5);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TaskKind::Sync.as_label(), "sync");
        assert_eq!(TaskKind::Async.as_label(), "async");
    }
}
