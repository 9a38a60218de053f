//! Application services

mod booking_conflicts;
mod confirmation;
mod conflict_detector;
mod expiration;
mod statistics;
mod sweeper_task;
mod waiting_list;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking_conflicts::BookingConflictService;
pub use confirmation::ConfirmationCoordinator;
pub use conflict_detector::{ConflictCheck, ConflictDetector};
pub use expiration::{ExpirationSweeper, DEFAULT_BATCH_SIZE};
pub use statistics::{ConflictStatistics, StatisticsAggregator};
pub use sweeper_task::{SweeperConfig, SweeperTask};
pub use waiting_list::{
    estimate_wait_hours, validate_guest_count, WaitingListConfig, WaitingListManager,
    WaitingPosition,
};
