//! # Hotel Booking Conflict Service
//!
//! Booking-conflict detection and room waiting lists for a hotel
//! reservation backend.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Stay windows, conflict records, waiting entries and
//!   repository traits
//! - **application**: Conflict detection, waiting list, confirmation, expiry
//!   and reporting services
//! - **infrastructure**: SeaORM persistence and in-memory repositories
//! - **notifications**: Event bus for confirmation events
//! - **server**: Runtime wiring, background sweeper and shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use application::BookingConflictService;

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
