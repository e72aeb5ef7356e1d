//! Create announcement table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Announcement::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Announcement::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Announcement::Content).text().not_null())
                    .col(ColumnDef::new(Announcement::Priority).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Announcement::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Announcement::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Announcement::TargetHostelId).string_len(32))
                    .col(ColumnDef::new(Announcement::TargetBlockId).string_len(32))
                    .col(ColumnDef::new(Announcement::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_author")
                            .from(Announcement::Table, Announcement::AuthorId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_announcement_target_hostel")
                            .from(Announcement::Table, Announcement::TargetHostelId)
                            .to(Hostel::Table, Hostel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: target_hostel_id (targeted listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_target_hostel_id")
                    .table(Announcement::Table)
                    .col(Announcement::TargetHostelId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_created_at")
                    .table(Announcement::Table)
                    .col(Announcement::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Announcement {
    Table,
    Id,
    Title,
    Content,
    Priority,
    IsPinned,
    AuthorId,
    TargetHostelId,
    TargetBlockId,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Hostel {
    Table,
    Id,
}
