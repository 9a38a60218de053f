//! SeaORM implementation of WaitingListRepository
//!
//! Exactly-once transitions rely on conditional updates
//! (`... WHERE id = ? AND status = 'Waiting'`); the one-active-entry rule
//! relies on the partial unique index created by the migrations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};
use tracing::debug;

use super::{db_err, stored_window};
use crate::domain::{
    DomainError, DomainResult, ExpiryCriteria, NewWaitingEntry, WaitingEntry,
    WaitingListRepository, WaitingStatus,
};
use crate::infrastructure::database::entities::waiting_list_entry::{self, Column, Entity};
use crate::shared::pagination::{PaginatedResult, PaginationParams};

pub struct SeaOrmWaitingListRepository {
    db: DatabaseConnection,
}

impl SeaOrmWaitingListRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: waiting_list_entry::Model) -> DomainResult<WaitingEntry> {
    Ok(WaitingEntry {
        id: m.id,
        room_id: m.room_id,
        user_id: m.user_id,
        window: stored_window("waiting list entry", m.id, m.check_in, m.check_out)?,
        guest_count: m.guest_count,
        priority: m.priority,
        status: WaitingStatus::parse(&m.status)?,
        confirmed_booking_id: m.confirmed_booking_id,
        created_at: m.created_at,
    })
}

fn models_to_domain(models: Vec<waiting_list_entry::Model>) -> DomainResult<Vec<WaitingEntry>> {
    models.into_iter().map(model_to_domain).collect()
}

fn in_queue_order(query: Select<Entity>) -> Select<Entity> {
    query
        .order_by_desc(Column::Priority)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
}

fn waiting() -> &'static str {
    WaitingStatus::Waiting.as_str()
}

// ── WaitingListRepository impl ──────────────────────────────────

#[async_trait]
impl WaitingListRepository for SeaOrmWaitingListRepository {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WaitingEntry>> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
        status: WaitingStatus,
    ) -> DomainResult<Option<WaitingEntry>> {
        // Terminal states may have several rows; report the most recent one
        Entity::find()
            .filter(Column::RoomId.eq(room_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(status.as_str()))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn save(&self, entry: NewWaitingEntry) -> DomainResult<WaitingEntry> {
        debug!(
            room_id = entry.room_id,
            user_id = entry.user_id,
            priority = entry.priority,
            "Saving waiting list entry"
        );

        let model = waiting_list_entry::ActiveModel {
            id: NotSet,
            room_id: Set(entry.room_id),
            user_id: Set(entry.user_id),
            check_in: Set(entry.window.check_in()),
            check_out: Set(entry.window.check_out()),
            guest_count: Set(entry.guest_count),
            priority: Set(entry.priority),
            status: Set(waiting().to_string()),
            confirmed_booking_id: Set(None),
            created_at: Set(entry.created_at),
        };

        match model.insert(&self.db).await {
            Ok(saved) => Ok(entry.into_entry(saved.id)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(DomainError::Conflict(format!(
                    "user {} is already waiting for room {}",
                    entry.user_id, entry.room_id
                ))),
                _ => Err(db_err(e)),
            },
        }
    }

    async fn mark_confirmed(&self, id: i64, booking_id: i64) -> DomainResult<bool> {
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(WaitingStatus::Confirmed.as_str()))
            .col_expr(Column::ConfirmedBookingId, Expr::value(booking_id))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(waiting()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn mark_expired(&self, ids: &[i64]) -> DomainResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(WaitingStatus::Expired.as_str()))
            .filter(Column::Id.is_in(ids.iter().copied()))
            .filter(Column::Status.eq(waiting()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn find_expired(
        &self,
        criteria: &ExpiryCriteria,
        limit: u64,
    ) -> DomainResult<Vec<WaitingEntry>> {
        if criteria.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut stale = Condition::any();
        if let Some(cutoff) = criteria.check_in_before {
            stale = stale.add(Column::CheckIn.lt(cutoff));
        }
        if let Some(cutoff) = criteria.created_on_or_before {
            stale = stale.add(Column::CreatedAt.lte(cutoff));
        }

        let models = Entity::find()
            .filter(Column::Status.eq(waiting()))
            .filter(stale)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_waiting_for_room(&self, room_id: i64) -> DomainResult<Vec<WaitingEntry>> {
        let query = Entity::find()
            .filter(Column::RoomId.eq(room_id))
            .filter(Column::Status.eq(waiting()));
        let models = in_queue_order(query).all(&self.db).await.map_err(db_err)?;
        models_to_domain(models)
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        status: Option<WaitingStatus>,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<WaitingEntry>> {
        let mut query = Entity::find().filter(Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let limit = page.limit.max(1);
        let paginator = in_queue_order(query).paginate(&self.db, u64::from(limit));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator.fetch_page(page.index()).await.map_err(db_err)?;

        Ok(PaginatedResult::new(
            models_to_domain(models)?,
            total,
            page.page.max(1),
            limit,
        ))
    }

    async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        room_id: Option<i64>,
    ) -> DomainResult<u64> {
        let mut query = Entity::find()
            .filter(Column::CreatedAt.gte(from))
            .filter(Column::CreatedAt.lt(until));
        if let Some(room_id) = room_id {
            query = query.filter(Column::RoomId.eq(room_id));
        }
        query.count(&self.db).await.map_err(db_err)
    }
}
