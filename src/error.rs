//! Error types used by the driver pipeline and tasks.
//!
//! A single enum, [`TaskError`], covers the whole taxonomy:
//!
//! - [`TaskError::Fail`]: an error produced by a task (or a hook) itself.
//! - [`TaskError::Panicked`]: a panic captured inside a task or a guarded
//!   final callback.
//! - [`TaskError::HopsExceeded`]: a thunk chain ran past the configured
//!   hop limit.
//!
//! The type is `Clone + PartialEq` so that settle mode can carry the error
//! through the result position unmodified and tests can compare outcomes
//! directly. `as_label` provides a short stable name for logs and events.

use thiserror::Error;

/// # Errors produced while driving a task.
///
/// Task and hook failures use [`TaskError::Fail`]; the remaining variants
/// are raised by the crate itself (captured panics, hop guard).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task (or hook) execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// A panic was captured while invoking a task or a guarded callback.
    #[error("panicked: {message}")]
    Panicked {
        /// The panic payload, rendered as text.
        message: String,
    },

    /// A thunk chain exceeded the configured hop limit.
    #[error("thunk chain exceeded {limit} hops")]
    HopsExceeded {
        /// The limit that was hit.
        limit: usize,
    },
}

impl TaskError {
    /// Shorthand for the common case: a failure with a message.
    ///
    /// # Example
    /// ```
    /// use taskdriver::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err, TaskError::Fail { error: "boom".to_string() });
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use taskdriver::TaskError;
    ///
    /// let err = TaskError::HopsExceeded { limit: 8 };
    /// assert_eq!(err.as_label(), "task_hops_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::HopsExceeded { .. } => "task_hops_exceeded",
        }
    }

    /// True for errors raised by the crate's own machinery (panic capture,
    /// hop guard) rather than returned by a task.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TaskError::Panicked { .. } | TaskError::HopsExceeded { .. }
        )
    }
}

/// Renders a panic payload as text.
///
/// Panic payloads are almost always `&str` or `String`; anything else is
/// reported as opaque.
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_constructor_matches_variant() {
        let err = TaskError::fail("two err");
        assert_eq!(
            err,
            TaskError::Fail {
                error: "two err".to_string()
            }
        );
        assert_eq!(err.as_label(), "task_failed");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_internal_variants_are_flagged() {
        assert!(TaskError::Panicked {
            message: "boom".into()
        }
        .is_internal());
        assert!(TaskError::HopsExceeded { limit: 4 }.is_internal());
    }

    #[test]
    fn test_panic_message_downcasts_common_payloads() {
        assert_eq!(panic_message(Box::new("static str")), "static str");
        assert_eq!(
            panic_message(Box::new(String::from("owned string"))),
            "owned string"
        );
        assert_eq!(panic_message(Box::new(42_u32)), "non-string panic payload");
    }

    #[test]
    fn test_display_includes_detail() {
        let err = TaskError::fail("two err");
        assert_eq!(err.to_string(), "execution failed: two err");

        let err = TaskError::HopsExceeded { limit: 2 };
        assert_eq!(err.to_string(), "thunk chain exceeded 2 hops");
    }
}
