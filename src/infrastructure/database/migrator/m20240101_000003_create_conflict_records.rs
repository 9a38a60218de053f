//! Create conflict_records table
//!
//! Append-only audit of detected overlaps.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConflictRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConflictRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConflictRecords::RoomId).integer().not_null())
                    .col(ColumnDef::new(ConflictRecords::UserId).integer().not_null())
                    .col(ColumnDef::new(ConflictRecords::CheckIn).date().not_null())
                    .col(ColumnDef::new(ConflictRecords::CheckOut).date().not_null())
                    .col(
                        ColumnDef::new(ConflictRecords::ConflictType)
                            .string()
                            .not_null()
                            .default("TimeOverlap"),
                    )
                    .col(
                        ColumnDef::new(ConflictRecords::Status)
                            .string()
                            .not_null()
                            .default("Detected"),
                    )
                    .col(
                        ColumnDef::new(ConflictRecords::DetectedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conflict_records_detected_at")
                    .table(ConflictRecords::Table)
                    .col(ConflictRecords::DetectedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_conflict_records_room")
                    .table(ConflictRecords::Table)
                    .col(ConflictRecords::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConflictRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ConflictRecords {
    Table,
    Id,
    RoomId,
    UserId,
    CheckIn,
    CheckOut,
    ConflictType,
    Status,
    DetectedAt,
}
