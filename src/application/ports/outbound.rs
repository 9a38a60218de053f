//! Outbound ports: interfaces for telling guests about queue outcomes
//!
//! [`NotificationDispatcher`] decouples the confirmation flow from the
//! delivery transport. The production implementation is
//! [`EventBusNotifier`](crate::notifications::EventBusNotifier); tests
//! substitute an in-process fake.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::BookingId;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Port for notifying a guest that their waiting entry became a booking.
///
/// Callers treat this as fire-and-forget: an `Err` is logged and dropped,
/// never surfaced to whoever confirmed the entry.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_waiting_list_confirmed(
        &self,
        user_id: i64,
        room_id: i64,
        booking_id: BookingId,
    ) -> Result<(), NotificationError>;
}

pub type SharedNotifier = Arc<dyn NotificationDispatcher>;
