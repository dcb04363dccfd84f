//! # Event subscribers for the driver pipeline.
//!
//! This module provides the [`Subscribe`] trait and a built-in implementation
//! for handling events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Driver ── publish(Event) ──► Bus ──► one worker per attached subscriber
//!                                              │
//!                                         ┌────┴────┬─────────┐
//!                                         ▼         ▼         ▼
//!                                      LogWriter  Metrics  Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```rust
//! use taskdriver::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe for MetricsSubscriber {
//!     async fn on_event(&self, event: &Event) {
//!         match event.kind {
//!             EventKind::TaskFailed => {
//!                 // increment failure counter
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
