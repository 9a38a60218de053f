//! Event-bus backed notification dispatcher

use async_trait::async_trait;
use chrono::Utc;

use super::event_bus::SharedEventBus;
use super::events::{Event, WaitingListConfirmedEvent};
use crate::application::ports::{NotificationDispatcher, NotificationError};
use crate::domain::BookingId;

/// Publishes confirmations on the in-process event bus. Delivery to the
/// guest (mail, push, ...) is left to bus subscribers.
pub struct EventBusNotifier {
    bus: SharedEventBus,
}

impl EventBusNotifier {
    pub fn new(bus: SharedEventBus) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl NotificationDispatcher for EventBusNotifier {
    async fn notify_waiting_list_confirmed(
        &self,
        user_id: i64,
        room_id: i64,
        booking_id: BookingId,
    ) -> Result<(), NotificationError> {
        self.bus
            .publish(Event::WaitingListConfirmed(WaitingListConfirmedEvent {
                user_id,
                room_id,
                booking_id,
                timestamp: Utc::now(),
            }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::create_event_bus;

    #[tokio::test]
    async fn confirmation_is_published() {
        let bus = create_event_bus();
        let mut subscriber = bus.subscribe();
        let notifier = EventBusNotifier::new(bus.clone());

        notifier.notify_waiting_list_confirmed(7, 100, 400).await.unwrap();

        let message = subscriber.recv().await.unwrap();
        match message.event {
            Event::WaitingListConfirmed(e) => {
                assert_eq!((e.user_id, e.room_id, e.booking_id), (7, 100, 400));
            }
        }
    }
}
