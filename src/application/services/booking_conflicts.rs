//! Booking conflict service
//!
//! Single entry point bundling detection, the waiting list, confirmation,
//! expiry and reporting over one set of repositories.

use std::sync::Arc;

use chrono::NaiveDate;

use super::confirmation::ConfirmationCoordinator;
use super::conflict_detector::{ConflictCheck, ConflictDetector};
use super::expiration::ExpirationSweeper;
use super::statistics::{ConflictStatistics, StatisticsAggregator};
use super::waiting_list::{WaitingListConfig, WaitingListManager, WaitingPosition};
use crate::application::ports::{SharedClock, SharedNotifier};
use crate::domain::{
    BookingId, DateRange, DomainResult, ExpiryPolicy, RepositoryProvider, StayWindow,
    WaitingEntry, WaitingStatus,
};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

pub struct BookingConflictService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    detector: ConflictDetector,
    waiting_list: WaitingListManager,
    confirmation: ConfirmationCoordinator,
    sweeper: Arc<ExpirationSweeper>,
    statistics: StatisticsAggregator,
    expiry_policy: ExpiryPolicy,
}

impl BookingConflictService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        notifier: SharedNotifier,
    ) -> Self {
        Self {
            detector: ConflictDetector::new(repos.clone(), clock.clone()),
            waiting_list: WaitingListManager::new(repos.clone(), clock.clone()),
            confirmation: ConfirmationCoordinator::new(repos.clone(), notifier),
            sweeper: Arc::new(ExpirationSweeper::new(repos.clone())),
            statistics: StatisticsAggregator::new(repos.clone()),
            expiry_policy: ExpiryPolicy::default(),
            repos,
            clock,
        }
    }

    pub fn with_waiting_list_config(mut self, config: WaitingListConfig) -> Self {
        self.waiting_list =
            WaitingListManager::new(self.repos.clone(), self.clock.clone()).with_config(config);
        self
    }

    pub fn with_expiry(mut self, policy: ExpiryPolicy, batch_size: u64) -> Self {
        self.expiry_policy = policy;
        self.sweeper =
            Arc::new(ExpirationSweeper::new(self.repos.clone()).with_batch_size(batch_size));
        self
    }

    /// Shared with the background sweeper task
    pub fn sweeper(&self) -> Arc<ExpirationSweeper> {
        self.sweeper.clone()
    }

    pub fn expiry_policy(&self) -> &ExpiryPolicy {
        &self.expiry_policy
    }

    pub fn clock(&self) -> SharedClock {
        self.clock.clone()
    }

    pub async fn detect_conflict(
        &self,
        room_id: i64,
        user_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<ConflictCheck> {
        let window = StayWindow::new(check_in, check_out)?;
        self.detector.detect(room_id, user_id, window).await
    }

    pub async fn join_waiting_list(
        &self,
        room_id: i64,
        user_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_count: i32,
    ) -> DomainResult<WaitingEntry> {
        let window = StayWindow::new(check_in, check_out)?;
        self.waiting_list
            .join(room_id, user_id, window, guest_count)
            .await
    }

    pub async fn get_user_waiting_list(
        &self,
        user_id: i64,
        status: Option<WaitingStatus>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<WaitingEntry>> {
        self.waiting_list.list(user_id, status, page).await
    }

    pub async fn confirm_waiting_list_booking(
        &self,
        entry_id: i64,
        booking_id: BookingId,
    ) -> DomainResult<bool> {
        self.confirmation.confirm(entry_id, booking_id).await
    }

    /// Who to offer the room to after a cancellation
    pub async fn next_in_line(&self, room_id: i64) -> DomainResult<Option<WaitingEntry>> {
        self.confirmation.next_in_line(room_id).await
    }

    /// One sweep with the configured policy at the current time
    pub async fn cleanup_expired_waiting_list(&self) -> DomainResult<u64> {
        self.sweeper
            .sweep(self.clock.now(), &self.expiry_policy)
            .await
    }

    pub async fn get_conflict_statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        room_id: Option<i64>,
    ) -> DomainResult<ConflictStatistics> {
        let range = DateRange::new(start, end)?;
        self.statistics.stats(range, room_id).await
    }

    pub async fn get_waiting_list_position(
        &self,
        room_id: i64,
        user_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<Option<WaitingPosition>> {
        let window = StayWindow::new(check_in, check_out)?;
        self.waiting_list
            .position_with_estimate(room_id, user_id, &window)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{day, jan, Fixture, RecordingNotifier};
    use crate::domain::{ConflictType, DomainError};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_support::{insert_booking, insert_room, test_db};
    use chrono::Duration;

    fn service(fx: &Fixture, notifier: Arc<RecordingNotifier>) -> BookingConflictService {
        BookingConflictService::new(fx.repos(), fx.clock.clone(), notifier)
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_up_front() {
        let fx = Fixture::new();
        let svc = service(&fx, Arc::new(RecordingNotifier::default()));

        let err = svc.detect_conflict(100, 1, day(12), day(10)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidWindow { .. }));

        let err = svc
            .join_waiting_list(100, 1, day(20), day(20), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidWindow { .. }));

        let err = svc
            .get_conflict_statistics(day(10), day(1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDateRange { .. }));

        let err = svc
            .get_waiting_list_position(100, 1, day(22), day(20))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn full_flow_in_memory() {
        let fx = Fixture::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(&fx, notifier.clone());
        fx.store.room_directory().add_room(100, "101");
        fx.store.booking_store().add_confirmed(400, 100, jan(10, 12));

        let check = svc.detect_conflict(100, 7, day(11), day(13)).await.unwrap();
        assert!(check.has_conflict);
        assert_eq!(check.conflict_type, Some(ConflictType::TimeOverlap));

        let entry = svc.join_waiting_list(100, 7, day(11), day(13), 2).await.unwrap();
        let pos = svc
            .get_waiting_list_position(100, 7, day(11), day(13))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pos.position, 1);

        assert!(svc.confirm_waiting_list_booking(entry.id, 401).await.unwrap());
        assert_eq!(notifier.wait_for(1).await, vec![(7, 100, 401)]);
        assert!(svc
            .get_waiting_list_position(100, 7, day(11), day(13))
            .await
            .unwrap()
            .is_none());

        let stats = svc.get_conflict_statistics(day(1), day(31), None).await.unwrap();
        assert_eq!(stats.total_conflicts, 1);
        assert_eq!(stats.waiting_list_count, 1);
        assert_eq!(stats.most_conflicted_room_number.as_deref(), Some("101"));
    }

    #[tokio::test]
    async fn cleanup_uses_configured_policy_and_clock() {
        let fx = Fixture::new();
        let svc = service(&fx, Arc::new(RecordingNotifier::default()))
            .with_expiry(ExpiryPolicy::older_than(Duration::hours(48)), 10);

        svc.join_waiting_list(100, 1, day(20), day(22), 1).await.unwrap();
        assert_eq!(svc.cleanup_expired_waiting_list().await.unwrap(), 0);

        fx.clock.advance(Duration::hours(48));
        assert_eq!(svc.cleanup_expired_waiting_list().await.unwrap(), 1);
        assert_eq!(svc.cleanup_expired_waiting_list().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn full_flow_on_sqlite() {
        let db = test_db().await;
        insert_room(&db, 100, "101").await;
        let window = StayWindow::new(day(10), day(12)).unwrap();
        let booking_id = insert_booking(&db, 100, window, "Confirmed").await;

        let fx = Fixture::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = BookingConflictService::new(
            Arc::new(SeaOrmRepositoryProvider::new(db)),
            fx.clock.clone(),
            notifier.clone(),
        );

        let check = svc.detect_conflict(100, 7, day(11), day(13)).await.unwrap();
        assert_eq!(check.conflicting_booking_ids, vec![booking_id]);
        assert!(!svc.detect_conflict(100, 7, day(12), day(14)).await.unwrap().has_conflict);

        let first = svc.join_waiting_list(100, 7, day(20), day(22), 2).await.unwrap();
        let again = svc.join_waiting_list(100, 7, day(20), day(22), 2).await.unwrap();
        assert_eq!(first.id, again.id);

        assert!(svc.confirm_waiting_list_booking(first.id, 500).await.unwrap());
        assert!(!svc.confirm_waiting_list_booking(999, 500).await.unwrap());
        assert_eq!(notifier.wait_for(1).await, vec![(7, 100, 500)]);

        let listed = svc
            .get_user_waiting_list(7, Some(WaitingStatus::Confirmed), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].confirmed_booking_id, Some(500));

        let stats = svc.get_conflict_statistics(day(5), day(5), Some(100)).await.unwrap();
        assert_eq!(stats.total_conflicts, 1);
        assert_eq!(stats.most_conflicted_room_number.as_deref(), Some("101"));
    }
}
