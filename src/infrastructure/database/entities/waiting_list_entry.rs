//! Waiting list entry entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "waiting_list_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub room_id: i64,
    pub user_id: i64,

    pub check_in: Date,
    pub check_out: Date,

    pub guest_count: i32,
    pub priority: i32,

    /// Entry status: Waiting, Confirmed, Expired
    pub status: String,

    #[sea_orm(nullable)]
    pub confirmed_booking_id: Option<i64>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
