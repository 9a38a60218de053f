//! In-memory repositories

mod memory;

pub use memory::{
    InMemoryBookingStore, InMemoryConflictRepository, InMemoryRepositoryProvider,
    InMemoryRoomDirectory, InMemoryWaitingListRepository,
};
