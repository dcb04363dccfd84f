//! Driver construction: configuration, the driver itself, and its product.
//!
//! This module groups the **option set** ([`DriverConfig`]), the **per-task
//! driver** built from it ([`Driver`]), and the **per-task product**
//! ([`Outcome`]).
//!
//! ## Contents
//! - [`DriverConfig`] all-optional, mergeable driver options
//! - [`Driver`] runs one task through hooks, normalization, and routing
//! - [`Outcome`] value or captured failure per task
//!
//! ## Quick reference
//! - **Construction**: `Driver::new` / `Driver::with_args` / `Driver::default`
//! - **Derivation**: `Driver::with(overrides)` merges field by field
//! - **Application**: `Driver::run(task)` once per task, or `Driver::to_fn()`
//!   for `futures` combinators

mod config;
mod driver;
mod outcome;

pub use config::DriverConfig;
pub use driver::Driver;
pub use outcome::Outcome;
