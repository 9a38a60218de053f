//! Read-only collaborator interfaces

use async_trait::async_trait;

use super::BookingId;
use crate::domain::{DomainResult, StayWindow};

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Confirmed bookings of `room_id` whose stay overlaps `window`
    /// (half-open; touching boundaries do not overlap)
    async fn find_overlapping_bookings(
        &self,
        room_id: i64,
        window: &StayWindow,
    ) -> DomainResult<Vec<BookingId>>;
}

#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Human-facing room number (e.g. "101"), if the room is known
    async fn room_number(&self, room_id: i64) -> DomainResult<Option<String>>;
}
