//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for observing driver events. Each
//! subscriber is driven by a dedicated worker loop spawned by
//! [`Bus::attach`](crate::events::Bus::attach).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching, retries); they do **not** block
//!   the publisher nor other subscribers.
//! - A subscriber that falls behind the bus capacity skips the missed events
//!   (logged with the subscriber's name).
//!
//! ## Example
//! ```rust
//! use taskdriver::{Event, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &Event) {
//!         let _ = ev; // write audit record...
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// ### Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for warnings and logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
