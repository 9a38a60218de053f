//! In-process event bus
//!
//! Confirmation events fan out over a tokio broadcast channel. Delivery
//! workers either take the whole stream or scope a subscription to one
//! guest.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

use super::events::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscribers: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Slow subscribers start losing the oldest events once `capacity`
    /// messages are pending.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscribers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns how many subscribers the event reached; zero is not an error.
    pub fn publish(&self, event: Event) -> usize {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let (room_id, user_id) = (message.event.room_id(), message.event.user_id());

        let reached = self.sender.send(message).unwrap_or(0);
        debug!(event_type, room_id, user_id, reached, "Event published");
        reached
    }

    /// Every event on the bus
    pub fn subscribe(&self) -> EventSubscriber {
        self.attach(None)
    }

    /// Only events addressed to `user_id`
    pub fn subscribe_guest(&self, user_id: i64) -> EventSubscriber {
        self.attach(Some(user_id))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::SeqCst)
    }

    fn attach(&self, guest: Option<i64>) -> EventSubscriber {
        let total = self.subscribers.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(guest, total, "Event subscriber attached");
        EventSubscriber {
            receiver: self.sender.subscribe(),
            guest,
            subscribers: self.subscribers.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    /// Set for guest-scoped subscriptions
    guest: Option<i64>,
    subscribers: Arc<AtomicUsize>,
}

impl EventSubscriber {
    fn wants(&self, message: &EventMessage) -> bool {
        self.guest.map_or(true, |user_id| message.event.user_id() == user_id)
    }

    /// Next matching event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) if self.wants(&message) => return Some(message),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!(guest = self.guest, missed, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Matching events already queued, without waiting for more.
    pub fn drain(&mut self) -> Vec<EventMessage> {
        let mut pending = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => {
                    if self.wants(&message) {
                        pending.push(message);
                    }
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(guest = self.guest, missed, "Event subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.subscribers.fetch_sub(1, Ordering::SeqCst);
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::WaitingListConfirmedEvent;
    use chrono::Utc;
    use std::time::Duration;

    fn confirmed(user_id: i64, room_id: i64) -> Event {
        Event::WaitingListConfirmed(WaitingListConfirmedEvent {
            user_id,
            room_id,
            booking_id: 400,
            timestamp: Utc::now(),
        })
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut subscriber = bus.subscribe();

        assert_eq!(bus.publish(confirmed(7, 100)), 1);

        let received = tokio::time::timeout(Duration::from_millis(100), subscriber.recv())
            .await
            .expect("timed out")
            .expect("bus closed");
        assert_eq!(received.event.event_type(), "waiting_list_confirmed");
        assert_eq!(received.event.room_id(), 100);
    }

    #[test]
    fn publish_without_subscribers_reaches_nobody() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(confirmed(7, 100)), 0);
    }

    #[tokio::test]
    async fn guest_subscription_skips_other_guests() {
        let bus = EventBus::new();
        let mut guest = bus.subscribe_guest(7);

        bus.publish(confirmed(8, 100));
        bus.publish(confirmed(7, 101));

        let received = tokio::time::timeout(Duration::from_millis(100), guest.recv())
            .await
            .expect("timed out")
            .expect("bus closed");
        assert_eq!((received.event.user_id(), received.event.room_id()), (7, 101));
    }

    #[test]
    fn drain_returns_pending_matches_only() {
        let bus = EventBus::new();
        let mut all = bus.subscribe();
        let mut guest = bus.subscribe_guest(7);

        bus.publish(confirmed(7, 100));
        bus.publish(confirmed(9, 100));
        bus.publish(confirmed(7, 200));

        assert_eq!(all.drain().len(), 3);
        let rooms: Vec<i64> = guest.drain().iter().map(|m| m.event.room_id()).collect();
        assert_eq!(rooms, vec![100, 200]);
        assert!(guest.drain().is_empty());
    }

    #[test]
    fn lagging_subscriber_keeps_newest_events() {
        let bus = EventBus::with_capacity(2);
        let mut subscriber = bus.subscribe();
        for room_id in 1..=5 {
            bus.publish(confirmed(7, room_id));
        }
        let rooms: Vec<i64> = subscriber.drain().iter().map(|m| m.event.room_id()).collect();
        assert_eq!(rooms, vec![4, 5]);
    }

    #[test]
    fn subscriber_count_tracks_drops() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let _second = bus.subscribe_guest(7);
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
    }
}
