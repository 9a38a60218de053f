//! Booking entity
//!
//! Owned by the booking-creation flow; the conflict core only reads it.

use sea_orm::entity::prelude::*;

/// Status value of a booking that occupies its room
pub const STATUS_CONFIRMED: &str = "Confirmed";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub room_id: i64,
    pub user_id: i64,

    /// First night of the stay
    pub check_in: Date,
    /// Departure day; not occupied
    pub check_out: Date,

    /// Booking status: Confirmed, Cancelled, ...
    pub status: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
