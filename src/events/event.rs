//! # Lifecycle events emitted by the driver.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: per-task execution flow (starting, stopped, failed)
//! - **Normalization events**: thunk chain progress (hop scheduled)
//! - **Settle events**: errors captured into results instead of short-circuiting
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! task kind, hop index, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskdriver::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("demo-task")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("demo-task"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::tasks::TaskKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of driver events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Task lifecycle events ===
    /// Driver picked up a task and is about to run its hooks.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `task_kind`: calling convention of the task
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStarting,

    /// Task settled with a value; hooks have finished.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStopped,

    /// Task settled with an error; hooks have finished.
    ///
    /// Emitted in both settle and fail-fast mode. In settle mode it is
    /// followed by [`ErrorCaptured`](EventKind::ErrorCaptured).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    // === Normalization events ===
    /// A task yielded a thunk; the follow-up task is scheduled next.
    ///
    /// Sets:
    /// - `task`: name of the follow-up task
    /// - `hop`: 1-based hop index within the chain
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ThunkScheduled,

    // === Settle events ===
    /// Settle mode folded a failure into the result stream.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ErrorCaptured,
}

/// Driver event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Calling convention of the task (set on `TaskStarting`).
    pub task_kind: Option<TaskKind>,
    /// 1-based hop index within a thunk chain (compact).
    pub hop: Option<u32>,
    /// Human-readable reason (failure messages).
    pub reason: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            task: None,
            task_kind: None,
            hop: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches the task's calling convention.
    #[inline]
    pub fn with_task_kind(mut self, kind: TaskKind) -> Self {
        self.task_kind = Some(kind);
        self
    }

    /// Attaches a hop index (saturated to `u32`).
    #[inline]
    pub fn with_hop(mut self, hop: usize) -> Self {
        self.hop = Some(hop.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_kind_and_leaves_metadata_unset() {
        let ev = Event::new(EventKind::TaskStopped);
        assert_eq!(ev.kind, EventKind::TaskStopped);
        assert!(ev.task.is_none());
        assert!(ev.task_kind.is_none());
        assert!(ev.hop.is_none());
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::ThunkScheduled)
            .with_task("chain")
            .with_task_kind(TaskKind::Sync)
            .with_hop(3)
            .with_reason("why not");

        assert_eq!(ev.task.as_deref(), Some("chain"));
        assert_eq!(ev.task_kind, Some(TaskKind::Sync));
        assert_eq!(ev.hop, Some(3));
        assert_eq!(ev.reason.as_deref(), Some("why not"));
    }

    #[test]
    fn test_seq_is_strictly_increasing() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskStarting);
        let c = Event::new(EventKind::TaskStopped);
        assert!(a.seq < b.seq, "seq must grow between events");
        assert!(b.seq < c.seq, "seq must grow between events");
    }
}
