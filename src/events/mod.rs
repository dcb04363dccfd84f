//! Driver events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the driver pipeline and
//! the normalization loop.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast` with worker attachment
//!
//! ## Quick reference
//! - **Publishers**: `Driver::run` (starting/stopped/failed/captured) and
//!   `normalize` (thunk hops).
//! - **Consumers**: workers spawned by `Bus::attach`, or raw receivers from
//!   `Bus::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
