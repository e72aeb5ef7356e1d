//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Email).string_len(256).not_null().unique_key())
                    .col(ColumnDef::new(User::Name).string_len(128).not_null())
                    .col(ColumnDef::new(User::Password).string_len(256).not_null())
                    .col(ColumnDef::new(User::Role).string_len(16).not_null())
                    .col(ColumnDef::new(User::Specialization).string_len(16))
                    .col(ColumnDef::new(User::HostelId).string_len(32))
                    .col(ColumnDef::new(User::BlockId).string_len(32))
                    .col(ColumnDef::new(User::RoomId).string_len(32))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_hostel")
                            .from(User::Table, User::HostelId)
                            .to(Hostel::Table, Hostel::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_block")
                            .from(User::Table, User::BlockId)
                            .to(Block::Table, Block::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_room")
                            .from(User::Table, User::RoomId)
                            .to(Room::Table, Room::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: role (for student head-counts and staff listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        // Index: hostel_id
        manager
            .create_index(
                Index::create()
                    .name("idx_user_hostel_id")
                    .table(User::Table)
                    .col(User::HostelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    Name,
    Password,
    Role,
    Specialization,
    HostelId,
    BlockId,
    RoomId,
    CreatedAt,
}

#[derive(Iden)]
enum Hostel {
    Table,
    Id,
}

#[derive(Iden)]
enum Block {
    Table,
    Id,
}

#[derive(Iden)]
enum Room {
    Table,
    Id,
}
