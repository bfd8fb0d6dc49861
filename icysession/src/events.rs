//! Typed event bus for host-facing session events
//!
//! Replaces post-and-forget broadcast notifications with a typed channel
//! the host subscribes to. Events fire after each distinct metadata or
//! state change, at most once per change.

use tokio::sync::broadcast;

use crate::pipeline::Metadata;

/// Default bus capacity; slow subscribers lag rather than block producers
pub const DEFAULT_EVENT_CAPACITY: usize = 32;

/// Events published by the session
#[derive(Clone, Debug, PartialEq)]
pub enum RadioEvent {
    /// A new, distinct track announcement finished processing
    Metadata(Metadata),
    /// Transport state changed; `true` means playing-or-about-to-play
    State(bool),
}

/// Broadcast bus carrying [`RadioEvent`]s to every subscriber
///
/// `publish()` is a sync call and never blocks. If there are no
/// subscribers, events are silently dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<RadioEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: RadioEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to all future events
    ///
    /// Each subscriber gets an independent receiver. Slow subscribers
    /// receive `RecvError::Lagged(n)` instead of blocking producers.
    pub fn subscribe(&self) -> broadcast::Receiver<RadioEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
