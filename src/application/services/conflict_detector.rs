//! Booking conflict detection
//!
//! Best-effort audit signal: the booking-creation path keeps its own
//! overlap constraint, so a booking inserted concurrently with a check may
//! go unreported here.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::ports::SharedClock;
use crate::domain::{
    BookingId, ConflictType, DomainResult, NewConflictRecord, RepositoryProvider, StayWindow,
};
use crate::shared::metrics::CONFLICTS_DETECTED_TOTAL;

pub const CONFLICT_DETECTED_MESSAGE: &str = "conflict detected";
pub const NO_CONFLICT_MESSAGE: &str = "no conflict";

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    pub conflict_type: Option<ConflictType>,
    pub message: String,
    /// Confirmed bookings that block the requested stay
    pub conflicting_booking_ids: Vec<BookingId>,
    /// Audit record written for this check, if any
    pub conflict_id: Option<i64>,
}

impl ConflictCheck {
    fn clear() -> Self {
        Self {
            has_conflict: false,
            conflict_type: None,
            message: NO_CONFLICT_MESSAGE.to_string(),
            conflicting_booking_ids: Vec::new(),
            conflict_id: None,
        }
    }
}

pub struct ConflictDetector {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl ConflictDetector {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Check `window` against the room's confirmed bookings and record a
    /// conflict when any of them overlaps.
    pub async fn detect(
        &self,
        room_id: i64,
        user_id: i64,
        window: StayWindow,
    ) -> DomainResult<ConflictCheck> {
        let blocking = self
            .repos
            .bookings()
            .find_overlapping_bookings(room_id, &window)
            .await?;

        if blocking.is_empty() {
            debug!(room_id, user_id, %window, "No booking conflict");
            return Ok(ConflictCheck::clear());
        }

        let record = self
            .repos
            .conflicts()
            .save(NewConflictRecord::time_overlap(
                room_id,
                user_id,
                window,
                self.clock.now(),
            ))
            .await?;
        metrics::counter!(CONFLICTS_DETECTED_TOTAL).increment(1);

        info!(
            room_id,
            user_id,
            %window,
            conflict_id = record.id,
            bookings = ?blocking,
            "Booking conflict detected"
        );

        Ok(ConflictCheck {
            has_conflict: true,
            conflict_type: Some(record.conflict_type),
            message: CONFLICT_DETECTED_MESSAGE.to_string(),
            conflicting_booking_ids: blocking,
            conflict_id: Some(record.id),
        })
    }
}
