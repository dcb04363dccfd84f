//! # Driver configuration with field-by-field merge.
//!
//! Provides [`DriverConfig`], the mergeable option set for building a
//! [`Driver`](crate::driver::Driver).
//!
//! Config is used in two ways:
//! 1. **Driver creation**: `Driver::new(config)` / `Driver::with_args(config, args)`
//! 2. **Derivation**: `Driver::with(overrides)` merges a new config over the
//!    driver's current one
//!
//! Every field is optional so that [`merge`](DriverConfig::merge) can tell
//! "explicitly configured" apart from "left to the fallback".
//!
//! ## Sentinel values
//! - `settle = None` → fail-fast (same as `Some(false)`)
//! - `max_hops = None` or `Some(0)` → unbounded thunk chains
//!
//! ## Example
//! ```rust
//! use taskdriver::DriverConfig;
//!
//! let cfg: DriverConfig<i32> = DriverConfig::default()
//!     .with_settle(true)
//!     .with_max_hops(8);
//!
//! assert!(cfg.settle());
//! assert_eq!(cfg.hop_limit(), Some(8));
//! ```

use std::sync::Arc;

use crate::events::Bus;
use crate::hooks::{AfterEach, BeforeEach, OnError};
use crate::norm::Adapt;

/// Option set for one driver.
///
/// Defines:
/// - **Hooks**: before-each / after-each / on-error lifecycle hooks
/// - **Failure mode**: settle (capture errors as outcomes) vs fail-fast
/// - **Environment**: shared context and fixed extra params for every call
/// - **Normalization**: invocation adapter and thunk hop limit
/// - **Observability**: event bus for lifecycle events
///
/// ## Field semantics
/// - `before_each` / `after_each` / `on_error`: unset hook = no-op
/// - `settle`: `None`/`Some(false)` = fail-fast, `Some(true)` = capture errors
/// - `context` / `params`: unset = `Default::default()` at `Driver::new`
/// - `adapter`: unset = `CallAdapter` (invoke the task, panics become errors)
/// - `max_hops`: `None`/`Some(0)` = unbounded
/// - `bus`: unset = no events published
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
pub struct DriverConfig<T, C = (), P = ()> {
    /// Hook fired before each task.
    pub before_each: Option<Arc<dyn BeforeEach<T, C, P>>>,

    /// Hook fired after each settlement (success or failure).
    pub after_each: Option<Arc<dyn AfterEach<T, C, P>>>,

    /// Hook fired on each error settlement, before `after_each`.
    pub on_error: Option<Arc<dyn OnError<T, C, P>>>,

    /// Failure mode.
    ///
    /// - `Some(true)` = settle: a failing task resolves `Ok(Outcome::Failed(e))`
    /// - `None` / `Some(false)` = fail-fast: a failing task resolves `Err(e)`
    pub settle: Option<bool>,

    /// Shared execution context handed to every task, hook, and adapter call.
    pub context: Option<Arc<C>>,

    /// Fixed extra parameters handed alongside the context.
    pub params: Option<Arc<P>>,

    /// Invocation adapter; unset uses [`CallAdapter`](crate::norm::CallAdapter).
    pub adapter: Option<Arc<dyn Adapt<T, C, P>>>,

    /// Thunk hop limit.
    ///
    /// - `None` or `Some(0)` = unbounded
    /// - `Some(n)` = the `n + 1`-th hop fails with `TaskError::HopsExceeded`
    pub max_hops: Option<usize>,

    /// Event bus for lifecycle events; unset publishes nothing.
    pub bus: Option<Bus>,
}

impl<T, C, P> DriverConfig<T, C, P> {
    /// Sets the before-each hook.
    pub fn with_before_each(mut self, hook: Arc<dyn BeforeEach<T, C, P>>) -> Self {
        self.before_each = Some(hook);
        self
    }

    /// Sets the after-each hook.
    pub fn with_after_each(mut self, hook: Arc<dyn AfterEach<T, C, P>>) -> Self {
        self.after_each = Some(hook);
        self
    }

    /// Sets the error hook.
    pub fn with_on_error(mut self, hook: Arc<dyn OnError<T, C, P>>) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Sets the failure mode (`true` = settle, `false` = fail-fast).
    pub fn with_settle(mut self, settle: bool) -> Self {
        self.settle = Some(settle);
        self
    }

    /// Sets the shared execution context.
    pub fn with_context(mut self, context: impl Into<Arc<C>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the fixed extra parameters.
    pub fn with_params(mut self, params: impl Into<Arc<P>>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets the invocation adapter.
    pub fn with_adapter(mut self, adapter: Arc<dyn Adapt<T, C, P>>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Sets the thunk hop limit (`0` = unbounded).
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Sets the event bus.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Returns the effective failure mode.
    ///
    /// - `false` → fail-fast (default)
    /// - `true` → settle
    #[inline]
    pub fn settle(&self) -> bool {
        self.settle.unwrap_or(false)
    }

    /// Returns the effective hop limit as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` thunk hops per call
    #[inline]
    pub fn hop_limit(&self) -> Option<usize> {
        match self.max_hops {
            None | Some(0) => None,
            Some(n) => Some(n),
        }
    }

    /// Merges `self` over `fallback`, field by field.
    ///
    /// A field set on `self` wins; an unset field falls back. This is a
    /// configuration merge, not a replacement: unset slots never erase the
    /// fallback's values.
    pub fn merge(mut self, fallback: &Self) -> Self {
        self.before_each = self.before_each.or_else(|| fallback.before_each.clone());
        self.after_each = self.after_each.or_else(|| fallback.after_each.clone());
        self.on_error = self.on_error.or_else(|| fallback.on_error.clone());
        self.settle = self.settle.or(fallback.settle);
        self.context = self.context.or_else(|| fallback.context.clone());
        self.params = self.params.or_else(|| fallback.params.clone());
        self.adapter = self.adapter.or_else(|| fallback.adapter.clone());
        self.max_hops = self.max_hops.or(fallback.max_hops);
        self.bus = self.bus.or_else(|| fallback.bus.clone());
        self
    }
}

impl<T, C, P> Default for DriverConfig<T, C, P> {
    /// Default configuration: every field unset.
    ///
    /// - fail-fast failure mode
    /// - no hooks, no bus
    /// - `Default::default()` context and params at driver construction
    /// - `CallAdapter` invocation, unbounded thunk chains
    fn default() -> Self {
        Self {
            before_each: None,
            after_each: None,
            on_error: None,
            settle: None,
            context: None,
            params: None,
            adapter: None,
            max_hops: None,
            bus: None,
        }
    }
}

impl<T, C, P> Clone for DriverConfig<T, C, P> {
    fn clone(&self) -> Self {
        Self {
            before_each: self.before_each.clone(),
            after_each: self.after_each.clone(),
            on_error: self.on_error.clone(),
            settle: self.settle,
            context: self.context.clone(),
            params: self.params.clone(),
            adapter: self.adapter.clone(),
            max_hops: self.max_hops,
            bus: self.bus.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::hooks::{AfterFn, BeforeFn};

    #[test]
    fn test_default_is_fully_unset() {
        let cfg: DriverConfig<i32> = DriverConfig::default();
        assert!(cfg.before_each.is_none());
        assert!(cfg.after_each.is_none());
        assert!(cfg.on_error.is_none());
        assert!(cfg.settle.is_none());
        assert!(cfg.context.is_none());
        assert!(cfg.params.is_none());
        assert!(cfg.adapter.is_none());
        assert!(cfg.max_hops.is_none());
        assert!(cfg.bus.is_none());
        assert!(!cfg.settle());
        assert_eq!(cfg.hop_limit(), None);
    }

    #[test]
    fn test_zero_max_hops_means_unbounded() {
        let cfg: DriverConfig<i32> = DriverConfig::default().with_max_hops(0);
        assert_eq!(cfg.max_hops, Some(0));
        assert_eq!(cfg.hop_limit(), None);

        let cfg = cfg.with_max_hops(4);
        assert_eq!(cfg.hop_limit(), Some(4));
    }

    #[test]
    fn test_merge_prefers_set_fields() {
        let base: DriverConfig<i32, i32> = DriverConfig::default()
            .with_settle(true)
            .with_max_hops(3)
            .with_context(7i32);
        let over: DriverConfig<i32, i32> = DriverConfig::default().with_max_hops(9);

        let merged = over.merge(&base);
        assert_eq!(merged.max_hops, Some(9), "override must win");
        assert_eq!(merged.settle, Some(true), "unset falls back");
        assert_eq!(merged.context.as_deref(), Some(&7));
    }

    #[test]
    fn test_merge_keeps_fallback_hooks() {
        let base: DriverConfig<i32> = DriverConfig::default()
            .with_before_each(BeforeFn::arc(|_t, _a| async { Ok(()) }))
            .with_settle(true);
        let over: DriverConfig<i32> = DriverConfig::default().with_after_each(AfterFn::arc(
            |_s: Result<i32, TaskError>, _t, _a| async { Ok(()) },
        ));

        let merged = over.merge(&base);
        assert!(merged.before_each.is_some(), "fallback hook must survive");
        assert!(merged.after_each.is_some(), "override hook must be present");
        assert!(merged.settle(), "fallback settle must survive");
    }

    #[test]
    fn test_with_context_accepts_plain_and_shared_values() {
        let plain: DriverConfig<(), String> = DriverConfig::default().with_context("ctx".to_string());
        assert_eq!(plain.context.as_deref(), Some(&"ctx".to_string()));

        let shared: DriverConfig<(), String> =
            DriverConfig::default().with_context(Arc::new("ctx".to_string()));
        assert_eq!(shared.context.as_deref(), Some(&"ctx".to_string()));
    }
}
