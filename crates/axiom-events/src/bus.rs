//! The Journal's `on(listener)` subscription bus.
//!
//! `spec.md` §4.A specifies synchronous in-process listeners where slow
//! subscribers block the append; §9's Design Notes flag this as needing
//! re-architecture for a concurrent target and ask for "a bounded
//! broadcast channel per subscriber with a documented drop-or-block
//! policy". Axiom's documented choice is **block**: each subscriber gets
//! its own bounded `mpsc` channel, and `publish` awaits the send to every
//! subscriber in turn — a full channel backs the appender up, exactly as
//! the source's synchronous listeners would. There is no lossy broadcast
//! path; a subscriber that never drains its channel will eventually stall
//! every `append`, which is the explicit tradeoff the spec calls out
//! ("callers bear responsibility for not performing I/O inside a
//! subscriber").

use axiom_core::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Default per-subscriber channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Opaque handle identifying one subscription, returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out point for journal events.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: std::sync::Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: std::sync::Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            capacity,
        }
    }

    /// Register a new subscriber. Returns a receiver and an unsubscribe
    /// handle; dropping the receiver is equivalent to unsubscribing.
    pub fn subscribe(&self) -> (SubscriberId, EventReceiver) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers
            .lock()
            .expect("event bus subscriber lock poisoned")
            .push(Subscriber { id, sender: tx });
        (id, EventReceiver { receiver: rx })
    }

    /// Remove a subscriber by handle.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers
            .lock()
            .expect("event bus subscriber lock poisoned")
            .retain(|s| s.id != id);
    }

    /// Deliver `event` to every live subscriber, in subscription order,
    /// awaiting each send. A subscriber whose receiver has been dropped
    /// is pruned silently.
    pub async fn publish(&self, event: Arc<Event>) {
        let senders: Vec<(SubscriberId, mpsc::Sender<Arc<Event>>)> = {
            let guard = self
                .subscribers
                .lock()
                .expect("event bus subscriber lock poisoned");
            guard.iter().map(|s| (s.id, s.sender.clone())).collect()
        };

        let mut dead = Vec::new();
        for (id, sender) in senders {
            trace!(seq = event.seq, subscriber = ?id, "delivering event");
            if sender.send(Arc::clone(&event)).await.is_err() {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            warn!(count = dead.len(), "pruning closed event subscribers");
            let mut guard = self
                .subscribers
                .lock()
                .expect("event bus subscriber lock poisoned");
            guard.retain(|s| !dead.contains(&s.id));
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("event bus subscriber lock poisoned")
            .len()
    }
}

/// Receiving half of a subscription.
pub struct EventReceiver {
    receiver: mpsc::Receiver<Arc<Event>>,
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiom_core::{EventPayload, EventType, SessionId, Timestamp};

    fn test_event(seq: u64) -> Arc<Event> {
        Arc::new(Event {
            seq,
            session_id: SessionId::new(),
            event_type: EventType::new("session.created"),
            timestamp: Timestamp::now(),
            payload: EventPayload::Raw(serde_json::json!({})),
            prev_hash: "0".repeat(64),
            hash: "a".repeat(64),
        })
    }

    #[tokio::test]
    async fn every_subscriber_receives_every_event_in_order() {
        let bus = EventBus::new();
        let (_id1, mut rx1) = bus.subscribe();
        let (_id2, mut rx2) = bus.subscribe();

        bus.publish(test_event(1)).await;
        bus.publish(test_event(2)).await;

        assert_eq!(rx1.recv().await.unwrap().seq, 1);
        assert_eq!(rx1.recv().await.unwrap().seq, 2);
        assert_eq!(rx2.recv().await.unwrap().seq, 1);
        assert_eq!(rx2.recv().await.unwrap().seq, 2);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let (id, mut rx) = bus.subscribe();
        bus.unsubscribe(id);
        bus.publish(test_event(1)).await;
        drop(bus);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropping_the_receiver_prunes_the_subscriber_on_next_publish() {
        let bus = EventBus::new();
        let (_id, rx) = bus.subscribe();
        drop(rx);
        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(test_event(1)).await;
        assert_eq!(bus.subscriber_count(), 0);
    }
}
