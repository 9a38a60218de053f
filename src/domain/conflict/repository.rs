//! Conflict repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{ConflictRecord, ConflictStatus, NewConflictRecord};
use crate::domain::DomainResult;

/// Conflict count for one room inside a reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConflictCount {
    pub room_id: i64,
    pub conflicts: u64,
}

#[async_trait]
pub trait ConflictRepository: Send + Sync {
    /// Persist a newly detected conflict
    async fn save(&self, record: NewConflictRecord) -> DomainResult<ConflictRecord>;

    /// Find conflict by ID
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ConflictRecord>>;

    /// Count conflicts detected in `[from, until)`, optionally for one room
    /// and/or one status
    async fn count_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
        status: Option<ConflictStatus>,
    ) -> DomainResult<u64>;

    /// Room with the most conflicts in `[from, until)`; ties go to the
    /// lowest room id
    async fn most_conflicted_room(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<Option<RoomConflictCount>>;
}
