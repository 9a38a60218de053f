//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod conflict_repository;
pub mod repository_provider;
pub mod waiting_list_repository;

pub use booking_repository::{SeaOrmBookingStore, SeaOrmRoomDirectory};
pub use conflict_repository::SeaOrmConflictRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use waiting_list_repository::SeaOrmWaitingListRepository;

use chrono::NaiveDate;

use crate::domain::{DomainError, DomainResult, StayWindow};

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Rebuild a window from stored columns; a row that violates the window
/// invariant is reported as corrupted rather than as bad input.
pub(crate) fn stored_window(
    table: &str,
    id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> DomainResult<StayWindow> {
    StayWindow::new(check_in, check_out).map_err(|_| {
        DomainError::Corrupted(format!(
            "{table} #{id} has check-in {check_in} not before check-out {check_out}"
        ))
    })
}
