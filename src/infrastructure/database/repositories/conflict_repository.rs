//! SeaORM implementation of ConflictRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use tracing::debug;

use super::{db_err, stored_window};
use crate::domain::{
    ConflictRecord, ConflictRepository, ConflictStatus, ConflictType, DomainResult,
    NewConflictRecord, RoomConflictCount,
};
use crate::infrastructure::database::entities::conflict_record;

pub struct SeaOrmConflictRepository {
    db: DatabaseConnection,
}

impl SeaOrmConflictRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: conflict_record::Model) -> DomainResult<ConflictRecord> {
    Ok(ConflictRecord {
        id: m.id,
        room_id: m.room_id,
        user_id: m.user_id,
        window: stored_window("conflict record", m.id, m.check_in, m.check_out)?,
        conflict_type: ConflictType::parse(&m.conflict_type)?,
        status: ConflictStatus::parse(&m.status)?,
        detected_at: m.detected_at,
    })
}

fn detected_between(
    from: DateTime<Utc>,
    until: DateTime<Utc>,
    room_id: Option<i64>,
) -> Select<conflict_record::Entity> {
    let mut query = conflict_record::Entity::find()
        .filter(conflict_record::Column::DetectedAt.gte(from))
        .filter(conflict_record::Column::DetectedAt.lt(until));
    if let Some(room_id) = room_id {
        query = query.filter(conflict_record::Column::RoomId.eq(room_id));
    }
    query
}

// ── ConflictRepository impl ─────────────────────────────────────

#[async_trait]
impl ConflictRepository for SeaOrmConflictRepository {
    async fn save(&self, record: NewConflictRecord) -> DomainResult<ConflictRecord> {
        debug!(
            room_id = record.room_id,
            user_id = record.user_id,
            "Saving conflict record"
        );

        let model = conflict_record::ActiveModel {
            id: NotSet,
            room_id: Set(record.room_id),
            user_id: Set(record.user_id),
            check_in: Set(record.window.check_in()),
            check_out: Set(record.window.check_out()),
            conflict_type: Set(record.conflict_type.as_str().to_string()),
            status: Set(ConflictStatus::Detected.as_str().to_string()),
            detected_at: Set(record.detected_at),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        Ok(record.into_record(saved.id))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<ConflictRecord>> {
        conflict_record::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn count_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
        status: Option<ConflictStatus>,
    ) -> DomainResult<u64> {
        let mut query = detected_between(from, until, room_id);
        if let Some(status) = status {
            query = query.filter(conflict_record::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(db_err)
    }

    async fn most_conflicted_room(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<Option<RoomConflictCount>> {
        let top: Option<(i64, i64)> = detected_between(from, until, room_id)
            .select_only()
            .column(conflict_record::Column::RoomId)
            .column_as(conflict_record::Column::Id.count(), "conflicts")
            .group_by(conflict_record::Column::RoomId)
            .order_by_desc(conflict_record::Column::Id.count())
            .order_by_asc(conflict_record::Column::RoomId)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(top.map(|(room_id, conflicts)| RoomConflictCount {
            room_id,
            conflicts: conflicts.max(0) as u64,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StayWindow;
    use crate::infrastructure::database::test_support::test_db;
    use chrono::{Duration, NaiveDate};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn record(room_id: i64, detected_at: DateTime<Utc>) -> NewConflictRecord {
        let window = StayWindow::new(
            NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
        )
        .unwrap();
        NewConflictRecord::time_overlap(room_id, 7, window, detected_at)
    }

    #[tokio::test]
    async fn save_assigns_id_and_round_trips() {
        let repo = SeaOrmConflictRepository::new(test_db().await);
        let saved = repo.save(record(100, at("2025-01-05T10:00:00Z"))).await.unwrap();
        assert!(saved.id > 0);
        assert_eq!(saved.status, ConflictStatus::Detected);

        let loaded = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(repo.find_by_id(saved.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn counts_respect_half_open_window_and_room() {
        let repo = SeaOrmConflictRepository::new(test_db().await);
        let from = at("2025-01-01T00:00:00Z");
        let until = at("2025-02-01T00:00:00Z");

        repo.save(record(100, from)).await.unwrap();
        repo.save(record(100, from + Duration::days(3))).await.unwrap();
        repo.save(record(200, from + Duration::days(4))).await.unwrap();
        repo.save(record(200, until)).await.unwrap();

        assert_eq!(repo.count_between(from, until, None, None).await.unwrap(), 3);
        assert_eq!(repo.count_between(from, until, Some(200), None).await.unwrap(), 1);
        assert_eq!(
            repo.count_between(from, until, None, Some(ConflictStatus::Resolved))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn most_conflicted_room_breaks_ties_by_lowest_id() {
        let repo = SeaOrmConflictRepository::new(test_db().await);
        let from = at("2025-01-01T00:00:00Z");
        let until = at("2025-02-01T00:00:00Z");

        for room in [300, 200, 300, 200] {
            repo.save(record(room, from + Duration::hours(1))).await.unwrap();
        }

        let top = repo.most_conflicted_room(from, until, None).await.unwrap().unwrap();
        assert_eq!(top, RoomConflictCount { room_id: 200, conflicts: 2 });

        repo.save(record(300, from + Duration::hours(2))).await.unwrap();
        let top = repo.most_conflicted_room(from, until, None).await.unwrap().unwrap();
        assert_eq!(top.room_id, 300);

        assert!(repo
            .most_conflicted_room(until, until + Duration::days(1), None)
            .await
            .unwrap()
            .is_none());
    }
}
