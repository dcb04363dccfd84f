//! # Guard the final completion callback.
//!
//! An aggregate run usually ends in one caller-supplied callback (log the
//! totals, flush a report, assert in tests). That callback executes inside
//! the async chain, so a panic or error inside it would unwind through the
//! driving combinator instead of reaching the caller's completion path.
//!
//! [`done_callback`] wraps such a callback: failures inside it are caught and
//! handed to a `done` continuation instead.
//!
//! ## Rules
//! - `f` returns `Ok(())` → `done(None)`
//! - `f` returns `Err(e)` → `done(Some(e))`
//! - `f` panics → `done(Some(TaskError::Panicked { .. }))` with the payload
//!   message preserved
//! - `done` is called exactly once
//!
//! ## Example
//! ```rust
//! use taskdriver::{TaskError, done_callback};
//!
//! let report = done_callback(
//!     |total: i32| {
//!         if total < 0 {
//!             return Err(TaskError::fail("negative total"));
//!         }
//!         println!("total = {total}");
//!         Ok(())
//!     },
//!     |err| match err {
//!         None => println!("done"),
//!         Some(e) => eprintln!("done with error: {e}"),
//!     },
//! );
//! report(7);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{TaskError, panic_message};

/// Wraps a completion callback so its failures reach `done` instead of
/// unwinding.
///
/// The returned closure invokes `f(args)` once and then reports: `done(None)`
/// on success, `done(Some(err))` when `f` fails or panics.
///
/// ### Parameters
/// - `f`: the completion callback to guard
/// - `done`: receives the outcome; called exactly once
pub fn done_callback<A, F, D>(f: F, done: D) -> impl FnOnce(A)
where
    F: FnOnce(A) -> Result<(), TaskError>,
    D: FnOnce(Option<TaskError>),
{
    move |args: A| match catch_unwind(AssertUnwindSafe(move || f(args))) {
        Ok(Ok(())) => done(None),
        Ok(Err(e)) => done(Some(e)),
        Err(panic_err) => done(Some(TaskError::Panicked {
            message: panic_message(panic_err),
        })),
    }
}
