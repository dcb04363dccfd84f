//! # Task abstractions.
//!
//! This module provides the core task-related types:
//! - [`Task`] - trait for implementing normalizable units of work
//! - [`TaskKind`] - tag describing how a task produces its result
//! - [`TaskStep`] - one settlement step (a value or a follow-up task)
//! - [`TaskArgs`] - shared context and parameters handed to every call
//! - [`TaskFn`] / [`SyncFn`] - function-based task implementations
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)

mod task;
mod task_fn;

pub use task::{Task, TaskArgs, TaskKind, TaskRef, TaskStep};
pub use task_fn::{SyncFn, TaskFn};
