//! Create waiting_list_entries table
//!
//! At most one `Waiting` entry per (room, user) is enforced by a partial
//! unique index. Terminal entries are kept for history and do not count.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaitingListEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WaitingListEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WaitingListEntries::RoomId).integer().not_null())
                    .col(ColumnDef::new(WaitingListEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(WaitingListEntries::CheckIn).date().not_null())
                    .col(ColumnDef::new(WaitingListEntries::CheckOut).date().not_null())
                    .col(
                        ColumnDef::new(WaitingListEntries::GuestCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(WaitingListEntries::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WaitingListEntries::Status)
                            .string()
                            .not_null()
                            .default("Waiting"),
                    )
                    .col(ColumnDef::new(WaitingListEntries::ConfirmedBookingId).integer())
                    .col(
                        ColumnDef::new(WaitingListEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Queue reads: room + status, then priority / age ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_waiting_list_room_status")
                    .table(WaitingListEntries::Table)
                    .col(WaitingListEntries::RoomId)
                    .col(WaitingListEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_waiting_list_user")
                    .table(WaitingListEntries::Table)
                    .col(WaitingListEntries::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_waiting_list_status_check_in")
                    .table(WaitingListEntries::Table)
                    .col(WaitingListEntries::Status)
                    .col(WaitingListEntries::CheckIn)
                    .to_owned(),
            )
            .await?;

        // Partial indexes are not expressible through the index builder
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_waiting_list_active_pair \
                 ON waiting_list_entries (room_id, user_id) \
                 WHERE status = 'Waiting'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaitingListEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WaitingListEntries {
    Table,
    Id,
    RoomId,
    UserId,
    CheckIn,
    CheckOut,
    GuestCount,
    Priority,
    Status,
    ConfirmedBookingId,
    CreatedAt,
}
