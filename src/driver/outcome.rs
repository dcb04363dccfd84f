//! # Per-task product of a driver run.
//!
//! [`Outcome`] is what one `Driver::run` resolves to on its success channel.
//! In fail-fast mode every outcome is a [`Outcome::Value`]; settle mode adds
//! [`Outcome::Failed`], the captured error riding in the result position so
//! the surrounding combinator keeps going.

use crate::error::TaskError;

/// Result of driving one task to settlement.
///
/// ### Rules
/// - `Value` carries the task's settled value (both modes)
/// - `Failed` carries a captured error, preserved unmodified; it only ever
///   appears in settle mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The task settled with a value.
    Value(T),
    /// Settle mode captured the task's failure as a result.
    Failed(TaskError),
}

impl<T> Outcome<T> {
    /// True if the task settled with a value.
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// True if settle mode captured a failure.
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns the settled value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::Failed(_) => None,
        }
    }

    /// Returns the captured error, if any.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }

    /// Unfolds the outcome back into a plain `Result`.
    pub fn into_result(self) -> Result<T, TaskError> {
        match self {
            Outcome::Value(v) => Ok(v),
            Outcome::Failed(e) => Err(e),
        }
    }
}
