//! Waiting list aggregate
//!
//! Contains the WaitingEntry entity, queue ordering, expiry policy and
//! repository interface.

pub mod model;
pub mod policy;
pub mod repository;

pub use model::{queue_order, NewWaitingEntry, WaitingEntry, WaitingStatus};
pub use policy::{ExpiryCriteria, ExpiryPolicy};
pub use repository::WaitingListRepository;
