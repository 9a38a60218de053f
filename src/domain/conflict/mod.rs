//! Conflict aggregate
//!
//! Audit records of stay requests that collided with a confirmed booking.

pub mod model;
pub mod repository;

pub use model::{ConflictRecord, ConflictStatus, ConflictType, NewConflictRecord};
pub use repository::{ConflictRepository, RoomConflictCount};
