//! Application ports (hexagonal architecture boundaries)
//!
//! Outbound collaborators the services call but do not own: the clock and
//! the notification channel.

pub mod clock;
pub mod outbound;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use outbound::{NotificationDispatcher, NotificationError, SharedNotifier};
