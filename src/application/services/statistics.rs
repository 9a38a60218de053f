//! Conflict and waiting list reporting

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{ConflictStatus, DateRange, DomainResult, RepositoryProvider};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictStatistics {
    pub total_conflicts: u64,
    pub resolved_conflicts: u64,
    /// Entries created in the range, whatever their current status
    pub waiting_list_count: u64,
    pub most_conflicted_room_id: Option<i64>,
    pub most_conflicted_room_number: Option<String>,
}

pub struct StatisticsAggregator {
    repos: Arc<dyn RepositoryProvider>,
}

impl StatisticsAggregator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Read-only summary over `range`, optionally narrowed to one room.
    pub async fn stats(
        &self,
        range: DateRange,
        room_id: Option<i64>,
    ) -> DomainResult<ConflictStatistics> {
        let (from, until) = range.bounds();
        let conflicts = self.repos.conflicts();

        let total_conflicts = conflicts.count_between(from, until, room_id, None).await?;
        let resolved_conflicts = conflicts
            .count_between(from, until, room_id, Some(ConflictStatus::Resolved))
            .await?;
        let waiting_list_count = self
            .repos
            .waiting_list()
            .count_created_between(from, until, room_id)
            .await?;

        let top = conflicts.most_conflicted_room(from, until, room_id).await?;
        let most_conflicted_room_number = match top {
            Some(top) => self.repos.rooms().room_number(top.room_id).await?,
            None => None,
        };

        debug!(
            %from,
            %until,
            room_id,
            total_conflicts,
            waiting_list_count,
            "Conflict statistics computed"
        );

        Ok(ConflictStatistics {
            total_conflicts,
            resolved_conflicts,
            waiting_list_count,
            most_conflicted_room_id: top.map(|t| t.room_id),
            most_conflicted_room_number,
        })
    }
}
