//! SeaORM implementations of the read-only booking collaborators

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::db_err;
use crate::domain::{BookingId, BookingStore, DomainResult, RoomDirectory, StayWindow};
use crate::infrastructure::database::entities::{booking, room};

pub struct SeaOrmBookingStore {
    db: DatabaseConnection,
}

impl SeaOrmBookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for SeaOrmBookingStore {
    async fn find_overlapping_bookings(
        &self,
        room_id: i64,
        window: &StayWindow,
    ) -> DomainResult<Vec<BookingId>> {
        // existing.check_in < requested.check_out && requested.check_in < existing.check_out
        booking::Entity::find()
            .select_only()
            .column(booking::Column::Id)
            .filter(booking::Column::RoomId.eq(room_id))
            .filter(booking::Column::Status.eq(booking::STATUS_CONFIRMED))
            .filter(booking::Column::CheckIn.lt(window.check_out()))
            .filter(booking::Column::CheckOut.gt(window.check_in()))
            .order_by_asc(booking::Column::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

pub struct SeaOrmRoomDirectory {
    db: DatabaseConnection,
}

impl SeaOrmRoomDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoomDirectory for SeaOrmRoomDirectory {
    async fn room_number(&self, room_id: i64) -> DomainResult<Option<String>> {
        let model = room::Entity::find_by_id(room_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.room_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_support::{insert_booking, insert_room, test_db};
    use chrono::NaiveDate;

    fn window(from: u32, to: u32) -> StayWindow {
        StayWindow::new(
            NaiveDate::from_ymd_opt(2025, 1, from).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, to).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn finds_only_confirmed_overlaps() {
        let db = test_db().await;
        insert_room(&db, 100, "101").await;
        insert_room(&db, 200, "201").await;
        let hit = insert_booking(&db, 100, window(10, 15), "Confirmed").await;
        insert_booking(&db, 100, window(10, 15), "Cancelled").await;
        insert_booking(&db, 100, window(15, 18), "Confirmed").await;
        insert_booking(&db, 200, window(10, 15), "Confirmed").await;

        let store = SeaOrmBookingStore::new(db);
        let found = store
            .find_overlapping_bookings(100, &window(12, 15))
            .await
            .unwrap();
        assert_eq!(found, vec![hit]);

        // touching the check-out day is not an overlap
        let found = store
            .find_overlapping_bookings(100, &window(18, 20))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn room_number_lookup() {
        let db = test_db().await;
        insert_room(&db, 100, "101").await;

        let rooms = SeaOrmRoomDirectory::new(db);
        assert_eq!(rooms.room_number(100).await.unwrap().as_deref(), Some("101"));
        assert_eq!(rooms.room_number(999).await.unwrap(), None);
    }
}
