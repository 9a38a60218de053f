//! Database entities module

pub mod booking;
pub mod conflict_record;
pub mod room;
pub mod waiting_list_entry;

pub use booking::Entity as Booking;
pub use conflict_record::Entity as ConflictRecord;
pub use room::Entity as Room;
pub use waiting_list_entry::Entity as WaitingListEntry;
