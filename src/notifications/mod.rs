//! Notifications module
//!
//! Broadcasts booking events to in-process subscribers.
//!
//! # Usage
//! ```ignore
//! use hotel_booking::notifications::{create_event_bus, EventBusNotifier};
//!
//! let event_bus = create_event_bus();
//! let notifier = EventBusNotifier::new(event_bus.clone());
//! let mut subscriber = event_bus.subscribe();
//! ```

pub mod event_bus;
pub mod events;
pub mod notifier;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
pub use notifier::EventBusNotifier;
