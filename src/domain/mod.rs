//! Domain layer
//!
//! Value types, closed status enums and the repository contracts the
//! application services depend on. Nothing in here knows about SeaORM.

pub mod booking;
pub mod conflict;
pub mod repositories;
pub mod stay;
pub mod waiting_list;

pub use booking::{BookingId, BookingStore, RoomDirectory};
pub use conflict::{
    ConflictRecord, ConflictRepository, ConflictStatus, ConflictType, NewConflictRecord,
    RoomConflictCount,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use stay::{DateRange, StayWindow};
pub use waiting_list::{
    ExpiryCriteria, ExpiryPolicy, NewWaitingEntry, WaitingEntry, WaitingListRepository,
    WaitingStatus,
};

pub use crate::shared::errors::DomainError;
