//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [starting] task=one kind=sync
//! [thunk] task=one-more hop=1
//! [stopped] task=one
//! [failed] task=two err="two err"
//! [captured] task=two err="two err"
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use taskdriver::{Bus, LogWriter};
//!
//! let bus = Bus::new(16);
//! let _worker = bus.attach(Arc::new(LogWriter));
//! // LogWriter will print all events to stdout
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event descriptions
/// to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskStarting => {
                if let (Some(task), Some(kind)) = (&e.task, e.task_kind) {
                    println!("[starting] task={task} kind={}", kind.as_label());
                } else if let Some(task) = &e.task {
                    println!("[starting] task={task}");
                }
            }
            EventKind::TaskStopped => {
                if let Some(task) = &e.task {
                    println!("[stopped] task={task}");
                }
            }
            EventKind::TaskFailed => {
                if let (Some(task), Some(reason)) = (&e.task, &e.reason) {
                    println!("[failed] task={task} err={reason:?}");
                }
            }
            EventKind::ThunkScheduled => {
                if let (Some(task), Some(hop)) = (&e.task, e.hop) {
                    println!("[thunk] task={task} hop={hop}");
                }
            }
            EventKind::ErrorCaptured => {
                if let (Some(task), Some(reason)) = (&e.task, &e.reason) {
                    println!("[captured] task={task} err={reason:?}");
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
