//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    BookingStore, ConflictRepository, RepositoryProvider, RoomDirectory, WaitingListRepository,
};

use super::booking_repository::{SeaOrmBookingStore, SeaOrmRoomDirectory};
use super::conflict_repository::SeaOrmConflictRepository;
use super::waiting_list_repository::SeaOrmWaitingListRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let queue = repos.waiting_list().find_waiting_for_room(100).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    conflicts: SeaOrmConflictRepository,
    waiting_list: SeaOrmWaitingListRepository,
    bookings: SeaOrmBookingStore,
    rooms: SeaOrmRoomDirectory,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            conflicts: SeaOrmConflictRepository::new(db.clone()),
            waiting_list: SeaOrmWaitingListRepository::new(db.clone()),
            bookings: SeaOrmBookingStore::new(db.clone()),
            rooms: SeaOrmRoomDirectory::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn conflicts(&self) -> &dyn ConflictRepository {
        &self.conflicts
    }

    fn waiting_list(&self) -> &dyn WaitingListRepository {
        &self.waiting_list
    }

    fn bookings(&self) -> &dyn BookingStore {
        &self.bookings
    }

    fn rooms(&self) -> &dyn RoomDirectory {
        &self.rooms
    }
}
