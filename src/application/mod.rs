pub mod ports;
pub mod services;

// Re-export key types for convenience
pub use ports::{
    Clock, ManualClock, NotificationDispatcher, NotificationError, SharedClock, SharedNotifier,
    SystemClock,
};
pub use services::{
    BookingConflictService, ConflictCheck, ConflictStatistics, SweeperConfig, SweeperTask,
    WaitingListConfig, WaitingPosition,
};
