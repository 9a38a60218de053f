//! Notification events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A waiting list entry was promoted to a booking
    WaitingListConfirmed(WaitingListConfirmedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::WaitingListConfirmed(_) => "waiting_list_confirmed",
        }
    }

    /// Room the event concerns
    pub fn room_id(&self) -> i64 {
        match self {
            Event::WaitingListConfirmed(e) => e.room_id,
        }
    }

    /// User who should hear about it
    pub fn user_id(&self) -> i64 {
        match self {
            Event::WaitingListConfirmed(e) => e.user_id,
        }
    }
}

/// Waiting list confirmation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingListConfirmedEvent {
    pub user_id: i64,
    pub room_id: i64,
    pub booking_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Envelope for events sent to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    /// Unique message ID
    pub id: String,
    /// Time the message was created
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_with_type_tag() {
        let message = EventMessage::new(Event::WaitingListConfirmed(WaitingListConfirmedEvent {
            user_id: 7,
            room_id: 100,
            booking_id: 400,
            timestamp: Utc::now(),
        }));

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "WaitingListConfirmed");
        assert_eq!(json["data"]["booking_id"], 400);
        assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
    }
}
