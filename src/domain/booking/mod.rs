//! Bookings and rooms as seen by the conflict core
//!
//! Both are owned by external subsystems; the core only reads them.

pub mod repository;

pub use repository::{BookingStore, RoomDirectory};

/// Identifier of a booking in the external booking store
pub type BookingId = i64;
