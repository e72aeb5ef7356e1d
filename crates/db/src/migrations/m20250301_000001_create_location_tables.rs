//! Create hostel, block and room tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hostel::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hostel::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Hostel::Name).string_len(128).not_null().unique_key())
                    .col(
                        ColumnDef::new(Hostel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Block::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Block::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Block::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Block::HostelId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Block::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_block_hostel")
                            .from(Block::Table, Block::HostelId)
                            .to(Hostel::Table, Hostel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_block_hostel_id")
                    .table(Block::Table)
                    .col(Block::HostelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Room::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Room::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Room::Number).string_len(32).not_null())
                    .col(ColumnDef::new(Room::BlockId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Room::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_block")
                            .from(Room::Table, Room::BlockId)
                            .to(Block::Table, Block::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_room_block_id")
                    .table(Room::Table)
                    .col(Room::BlockId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Room::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Block::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Hostel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hostel {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Block {
    Table,
    Id,
    Name,
    HostelId,
    CreatedAt,
}

#[derive(Iden)]
enum Room {
    Table,
    Id,
    Number,
    BlockId,
    CreatedAt,
}
