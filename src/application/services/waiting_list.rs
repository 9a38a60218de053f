//! Waiting list management: joining, listing and queue positions

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::ports::SharedClock;
use crate::domain::{
    DomainError, DomainResult, NewWaitingEntry, RepositoryProvider, StayWindow, WaitingEntry,
    WaitingStatus,
};
use crate::shared::metrics::WAITING_LIST_JOINS_TOTAL;
use crate::shared::pagination::{PaginatedResult, PaginationParams};

/// A lost insert race is resolved by re-reading the winner; a few rounds
/// cover the window where the winner is already terminal again.
const JOIN_ATTEMPTS: usize = 3;

/// Configuration for the waiting list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingListConfig {
    /// Priority assigned to every new entry
    pub default_priority: i32,
    /// Upper bound on page size for listings
    pub max_page_size: u32,
    /// Average stay used for wait estimates
    pub avg_stay_days: u32,
}

impl Default for WaitingListConfig {
    fn default() -> Self {
        Self {
            default_priority: 1,
            max_page_size: 100,
            avg_stay_days: 2,
        }
    }
}

/// Caller's place in a room queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitingPosition {
    /// 1-based rank
    pub position: u32,
    pub estimated_wait_hours: u32,
}

pub fn validate_guest_count(guest_count: i32) -> DomainResult<()> {
    if guest_count < 1 {
        return Err(DomainError::InvalidGuestCount(guest_count));
    }
    Ok(())
}

/// Rough wait estimate for a queue position: half of the worst case where
/// every guest ahead stays the full average.
pub fn estimate_wait_hours(position: u32, avg_stay_days: u32) -> u32 {
    position
        .saturating_mul(avg_stay_days)
        .saturating_mul(24)
        / 2
}

pub struct WaitingListManager {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    config: WaitingListConfig,
}

impl WaitingListManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self {
            repos,
            clock,
            config: WaitingListConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WaitingListConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &WaitingListConfig {
        &self.config
    }

    /// Queue `user_id` for `room_id`.
    ///
    /// Keyed on (room, user) only: if the pair is already waiting, the
    /// existing entry is returned unchanged even when `window` differs.
    pub async fn join(
        &self,
        room_id: i64,
        user_id: i64,
        window: StayWindow,
        guest_count: i32,
    ) -> DomainResult<WaitingEntry> {
        validate_guest_count(guest_count)?;
        let repo = self.repos.waiting_list();

        for attempt in 1..=JOIN_ATTEMPTS {
            if let Some(existing) = repo
                .find_by_room_and_user(room_id, user_id, WaitingStatus::Waiting)
                .await?
            {
                debug!(room_id, user_id, entry_id = existing.id, "Already on waiting list");
                metrics::counter!(WAITING_LIST_JOINS_TOTAL, "outcome" => "existing").increment(1);
                return Ok(existing);
            }

            let new_entry = NewWaitingEntry {
                room_id,
                user_id,
                window,
                guest_count,
                priority: self.config.default_priority,
                created_at: self.clock.now(),
            };

            match repo.save(new_entry).await {
                Ok(entry) => {
                    info!(
                        room_id,
                        user_id,
                        entry_id = entry.id,
                        %window,
                        priority = entry.priority,
                        "Joined waiting list"
                    );
                    metrics::counter!(WAITING_LIST_JOINS_TOTAL, "outcome" => "created")
                        .increment(1);
                    return Ok(entry);
                }
                Err(DomainError::Conflict(_)) => {
                    debug!(room_id, user_id, attempt, "Lost waiting list insert race");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(room_id, user_id, "Waiting list join did not settle");
        Err(DomainError::Conflict(format!(
            "waiting list entry for user {user_id} and room {room_id} is changing concurrently"
        )))
    }

    /// A user's entries in queue order
    pub async fn list(
        &self,
        user_id: i64,
        status: Option<WaitingStatus>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<WaitingEntry>> {
        let page = page.clamped(self.config.max_page_size);
        self.repos
            .waiting_list()
            .list_for_user(user_id, status, page)
            .await
    }

    /// 1-based rank of the caller's waiting entry for the room, or `None`
    /// when the caller is not waiting there.
    pub async fn position(
        &self,
        room_id: i64,
        user_id: i64,
        _window: &StayWindow,
    ) -> DomainResult<Option<u32>> {
        let queue = self.repos.waiting_list().find_waiting_for_room(room_id).await?;
        Ok(queue
            .iter()
            .position(|e| e.user_id == user_id)
            .map(|idx| u32::try_from(idx + 1).unwrap_or(u32::MAX)))
    }

    pub async fn position_with_estimate(
        &self,
        room_id: i64,
        user_id: i64,
        window: &StayWindow,
    ) -> DomainResult<Option<WaitingPosition>> {
        let position = self.position(room_id, user_id, window).await?;
        Ok(position.map(|position| WaitingPosition {
            position,
            estimated_wait_hours: estimate_wait_hours(position, self.config.avg_stay_days),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{jan, Fixture};
    use crate::application::ports::Clock;
    use chrono::Duration;

    fn manager(fx: &Fixture) -> WaitingListManager {
        WaitingListManager::new(fx.repos(), fx.clock.clone())
    }

    #[tokio::test]
    async fn join_creates_waiting_entry_with_default_priority() {
        let fx = Fixture::new();
        let entry = manager(&fx).join(100, 1, jan(20, 22), 2).await.unwrap();

        assert_eq!(entry.status, WaitingStatus::Waiting);
        assert_eq!(entry.priority, WaitingListConfig::default().default_priority);
        assert_eq!(entry.guest_count, 2);
        assert_eq!(entry.created_at, fx.clock.now());
        assert_eq!(entry.window, jan(20, 22));
    }

    #[tokio::test]
    async fn repeated_join_returns_same_entry() {
        let fx = Fixture::new();
        let wl = manager(&fx);
        let first = wl.join(100, 1, jan(20, 22), 2).await.unwrap();
        fx.clock.advance(Duration::minutes(10));
        let second = wl.join(100, 1, jan(25, 28), 3).await.unwrap();

        assert_eq!(first, second);
        let listed = wl.list(1, None, PaginationParams::default()).await.unwrap();
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn concurrent_joins_yield_one_entry() {
        let fx = Fixture::new();
        let wl = Arc::new(manager(&fx));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let wl = wl.clone();
            handles.push(tokio::spawn(async move { wl.join(100, 1, jan(20, 22), 2).await }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(fx.store.waiting_list().find_waiting_for_room(100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_guest_count_is_rejected_before_storage() {
        let fx = Fixture::new();
        let err = manager(&fx).join(100, 1, jan(20, 22), 0).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidGuestCount(0)));
        assert!(err.is_validation());
        assert!(fx.store.waiting_list().find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn positions_form_a_permutation() {
        let fx = Fixture::new();
        let wl = manager(&fx);
        for user in 1..=5 {
            wl.join(100, user, jan(20, 22), 1).await.unwrap();
            fx.clock.advance(Duration::minutes(1));
        }

        let mut positions = Vec::new();
        for user in 1..=5 {
            positions.push(wl.position(100, user, &jan(20, 22)).await.unwrap().unwrap());
        }
        assert_eq!(positions, vec![1, 2, 3, 4, 5]);
        assert_eq!(wl.position(100, 99, &jan(20, 22)).await.unwrap(), None);
        assert_eq!(wl.position(200, 1, &jan(20, 22)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn higher_priority_jumps_the_queue() {
        let fx = Fixture::new();
        let regular = manager(&fx);
        let vip = manager(&fx).with_config(WaitingListConfig {
            default_priority: 10,
            ..WaitingListConfig::default()
        });

        regular.join(100, 1, jan(20, 22), 1).await.unwrap();
        fx.clock.advance(Duration::minutes(1));
        vip.join(100, 2, jan(20, 22), 1).await.unwrap();

        assert_eq!(regular.position(100, 2, &jan(20, 22)).await.unwrap(), Some(1));
        assert_eq!(regular.position(100, 1, &jan(20, 22)).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn listing_is_clamped_and_filtered() {
        let fx = Fixture::new();
        let wl = manager(&fx).with_config(WaitingListConfig {
            max_page_size: 2,
            ..WaitingListConfig::default()
        });
        for room in 1..=3 {
            wl.join(room, 7, jan(20, 22), 1).await.unwrap();
        }

        let page = wl.list(7, None, PaginationParams::new(0, 50)).await.unwrap();
        assert_eq!((page.page, page.limit, page.total), (1, 2, 3));
        assert_eq!(page.items.len(), 2);

        let expired = wl
            .list(7, Some(WaitingStatus::Expired), PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(expired.total, 0);
    }

    #[tokio::test]
    async fn estimate_includes_configured_stay() {
        let fx = Fixture::new();
        let wl = manager(&fx);
        wl.join(100, 1, jan(20, 22), 1).await.unwrap();

        let pos = wl
            .position_with_estimate(100, 1, &jan(20, 22))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pos.position, 1);
        assert_eq!(pos.estimated_wait_hours, 24);
    }

    #[test]
    fn estimate_is_bounded_and_monotonic() {
        let mut previous = 0;
        for position in 0..50 {
            let hours = estimate_wait_hours(position, 3);
            assert!(hours >= previous);
            assert!(u64::from(hours) <= u64::from(position) * 3 * 24);
            previous = hours;
        }
        assert_eq!(estimate_wait_hours(u32::MAX, u32::MAX), u32::MAX / 2);
    }

    #[test]
    fn guest_count_must_be_positive() {
        assert!(validate_guest_count(1).is_ok());
        assert!(matches!(validate_guest_count(-3), Err(DomainError::InvalidGuestCount(-3))));
    }
}
