//! Waiting list repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewWaitingEntry, WaitingEntry, WaitingStatus};
use super::policy::ExpiryCriteria;
use crate::domain::DomainResult;
use crate::shared::pagination::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait WaitingListRepository: Send + Sync {
    /// Find entry by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WaitingEntry>>;

    /// Find the entry for a (room, user) pair in the given status. For
    /// `Waiting` there is at most one; for terminal statuses the most
    /// recently created entry is returned (created_at, then id, descending).
    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
        status: WaitingStatus,
    ) -> DomainResult<Option<WaitingEntry>>;

    /// Insert a new `Waiting` entry.
    ///
    /// Fails with `DomainError::Conflict` when the pair already has a
    /// `Waiting` entry; the check is enforced by the store, not the caller.
    async fn save(&self, entry: NewWaitingEntry) -> DomainResult<WaitingEntry>;

    /// Conditionally move one entry `Waiting -> Confirmed`. Returns false if
    /// the entry is missing or no longer waiting.
    async fn mark_confirmed(&self, id: i64, booking_id: i64) -> DomainResult<bool>;

    /// Move every listed entry that is still `Waiting` to `Expired`.
    /// Returns how many actually transitioned.
    async fn mark_expired(&self, ids: &[i64]) -> DomainResult<u64>;

    /// Up to `limit` waiting entries matching the criteria, oldest first
    async fn find_expired(
        &self,
        criteria: &ExpiryCriteria,
        limit: u64,
    ) -> DomainResult<Vec<WaitingEntry>>;

    /// All waiting entries for a room in queue order
    async fn find_waiting_for_room(&self, room_id: i64) -> DomainResult<Vec<WaitingEntry>>;

    /// A user's entries in queue order, optionally filtered by status
    async fn list_for_user(
        &self,
        user_id: i64,
        status: Option<WaitingStatus>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<WaitingEntry>>;

    /// Entries created in `[from, until)` in any status
    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<u64>;
}
