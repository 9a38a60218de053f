//! Conflict record entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "conflict_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub room_id: i64,
    pub user_id: i64,

    pub check_in: Date,
    pub check_out: Date,

    /// Conflict type: TimeOverlap
    pub conflict_type: String,

    /// Conflict status: Detected, Resolved
    pub status: String,

    pub detected_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
