//! # Event bus for broadcasting driver events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the driver pipeline.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                    Subscribers (many):
//!   Driver 1 ──┐                      ┌────► worker ────► subscriber.on_event()
//!   Driver 2 ──┼──────► Bus ──────────┤
//!   normalize ─┘  (broadcast chan)    └────► raw broadcast::Receiver
//! ```
//!
//! Each [`attach`](Bus::attach) call spawns an independent worker that feeds one
//! [`Subscribe`](crate::subscribers::Subscribe) implementor; raw receivers from
//! [`subscribe`](Bus::subscribe) are available when a worker loop is not wanted.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.
//!
//! ## Capacity behavior
//! When the channel reaches capacity and new events are sent:
//! - The ring buffer keeps only the most recent `capacity` events.
//! - Receivers that fell behind observe `RecvError::Lagged(n)` on the next `recv()`,
//!   indicating how many events were skipped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use super::event::Event;
use crate::error::panic_message;
use crate::subscribers::Subscribe;

/// Broadcast channel for driver events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides `publish`/`subscribe` API.
/// Multiple publishers can publish concurrently; subscribers receive clones of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-subscriber).
    /// - When receivers lag, they will observe `RecvError::Lagged`.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// - Takes ownership of the event; the broadcast channel clones it for each receiver.
    /// - If there are no receivers, the event is dropped (this function still returns immediately).
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Publishes a borrowed event by cloning it.
    ///
    /// Shorthand for `publish(ev.clone())`, useful when you already have a reference.
    pub fn publish_ref(&self, ev: &Event) {
        let _ = self.tx.send(ev.clone());
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Spawns a worker that feeds every subsequent event to `subscriber`.
    ///
    /// The worker runs until the bus (all senders) is dropped, then exits.
    ///
    /// ### Rules
    /// - **Isolation**: a panic inside `on_event` is caught and logged; the
    ///   worker keeps processing the next event.
    /// - **Lag**: when the receiver falls behind, skipped events are logged
    ///   with the subscriber's name and the worker continues.
    pub fn attach(&self, subscriber: Arc<dyn Subscribe>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        let fut = subscriber.on_event(&ev);
                        if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                            eprintln!(
                                "[taskdriver] subscriber '{}' panicked: {}",
                                subscriber.name(),
                                panic_message(panic_err)
                            );
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        eprintln!(
                            "[taskdriver] subscriber '{}' lagged, skipped {n} event(s)",
                            subscriber.name()
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;

    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Grenade;

    #[async_trait]
    impl Subscribe for Grenade {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "grenade"
        }
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::TaskStarting));
    }

    #[tokio::test]
    async fn test_subscribe_receives_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::TaskStarting).with_task("t"));
        bus.publish_ref(&Event::new(EventKind::TaskStopped).with_task("t"));

        let first = rx.recv().await.expect("first event");
        let second = rx.recv().await.expect("second event");
        assert_eq!(first.kind, EventKind::TaskStarting);
        assert_eq!(second.kind, EventKind::TaskStopped);
        assert!(first.seq < second.seq, "sequence must be preserved");
    }

    #[tokio::test]
    async fn test_attach_feeds_subscriber() {
        let bus = Bus::new(8);
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let worker = bus.attach(Arc::clone(&recorder) as Arc<dyn Subscribe>);

        bus.publish(Event::new(EventKind::TaskStarting));
        bus.publish(Event::new(EventKind::TaskFailed));
        drop(bus);

        worker.await.expect("worker must exit after bus drop");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(*seen, vec![EventKind::TaskStarting, EventKind::TaskFailed]);
    }

    #[tokio::test]
    async fn test_attach_survives_subscriber_panic() {
        let bus = Bus::new(8);
        let grenade = bus.attach(Arc::new(Grenade));
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let worker = bus.attach(Arc::clone(&recorder) as Arc<dyn Subscribe>);

        bus.publish(Event::new(EventKind::TaskStarting));
        tokio::time::sleep(Duration::from_millis(20)).await;
        bus.publish(Event::new(EventKind::TaskStopped));
        drop(bus);

        grenade.await.expect("panicking subscriber must be isolated");
        worker.await.expect("worker must exit after bus drop");
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(*seen, vec![EventKind::TaskStarting, EventKind::TaskStopped]);
    }
}
