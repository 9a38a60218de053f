//! Promotion of waiting entries to confirmed bookings

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ports::SharedNotifier;
use crate::domain::{BookingId, DomainResult, RepositoryProvider, WaitingEntry, WaitingStatus};
use crate::shared::metrics::{NOTIFICATIONS_FAILED_TOTAL, WAITING_LIST_CONFIRMATIONS_TOTAL};

pub struct ConfirmationCoordinator {
    repos: Arc<dyn RepositoryProvider>,
    notifier: SharedNotifier,
}

impl ConfirmationCoordinator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, notifier: SharedNotifier) -> Self {
        Self { repos, notifier }
    }

    /// Confirm a waiting entry against `booking_id`.
    ///
    /// Returns false for unknown or expired entries and for entries already
    /// confirmed against another booking. Confirming again with the same
    /// booking is a no-op that returns true. Only the call that performs the
    /// transition notifies the guest.
    pub async fn confirm(&self, entry_id: i64, booking_id: BookingId) -> DomainResult<bool> {
        let repo = self.repos.waiting_list();

        let Some(entry) = repo.find_by_id(entry_id).await? else {
            debug!(entry_id, "Confirm requested for unknown waiting entry");
            return Ok(false);
        };

        match entry.status {
            WaitingStatus::Waiting => {
                if repo.mark_confirmed(entry_id, booking_id).await? {
                    metrics::counter!(WAITING_LIST_CONFIRMATIONS_TOTAL).increment(1);
                    info!(
                        entry_id,
                        booking_id,
                        room_id = entry.room_id,
                        user_id = entry.user_id,
                        "Waiting entry confirmed"
                    );
                    self.dispatch(&entry, booking_id);
                    return Ok(true);
                }

                // Someone else moved it first
                let current = repo.find_by_id(entry_id).await?;
                Ok(current.is_some_and(|e| confirmed_with(&e, booking_id)))
            }
            WaitingStatus::Confirmed => Ok(confirmed_with(&entry, booking_id)),
            WaitingStatus::Expired => {
                debug!(entry_id, "Confirm requested for expired waiting entry");
                Ok(false)
            }
        }
    }

    /// Head of the room's queue
    pub async fn next_in_line(&self, room_id: i64) -> DomainResult<Option<WaitingEntry>> {
        let queue = self.repos.waiting_list().find_waiting_for_room(room_id).await?;
        Ok(queue.into_iter().next())
    }

    /// Fire-and-forget; the confirmation already stands.
    fn dispatch(&self, entry: &WaitingEntry, booking_id: BookingId) {
        let notifier = self.notifier.clone();
        let (user_id, room_id) = (entry.user_id, entry.room_id);

        tokio::spawn(async move {
            if let Err(e) = notifier
                .notify_waiting_list_confirmed(user_id, room_id, booking_id)
                .await
            {
                metrics::counter!(NOTIFICATIONS_FAILED_TOTAL).increment(1);
                warn!(user_id, room_id, booking_id, error = %e, "Confirmation notification failed");
            }
        });
    }
}

fn confirmed_with(entry: &WaitingEntry, booking_id: BookingId) -> bool {
    entry.status == WaitingStatus::Confirmed && entry.confirmed_booking_id == Some(booking_id)
}
