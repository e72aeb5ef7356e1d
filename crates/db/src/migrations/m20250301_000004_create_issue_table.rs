//! Create issue table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issue::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issue::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Issue::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Issue::Description).text().not_null())
                    .col(ColumnDef::new(Issue::Priority).string_len(16).not_null())
                    .col(ColumnDef::new(Issue::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Issue::Visibility).string_len(16).not_null())
                    .col(ColumnDef::new(Issue::CategoryId).string_len(32).not_null())
                    .col(ColumnDef::new(Issue::ReporterId).string_len(32).not_null())
                    .col(ColumnDef::new(Issue::AssigneeId).string_len(32))
                    .col(ColumnDef::new(Issue::HostelId).string_len(32).not_null())
                    .col(ColumnDef::new(Issue::BlockId).string_len(32).not_null())
                    .col(ColumnDef::new(Issue::RoomId).string_len(32).not_null())
                    .col(ColumnDef::new(Issue::MediaUrl).string_len(1024))
                    .col(ColumnDef::new(Issue::ImageUrls).json_binary().not_null())
                    .col(ColumnDef::new(Issue::IsDuplicate).boolean().not_null().default(false))
                    .col(ColumnDef::new(Issue::MergedWith).string_len(32))
                    .col(
                        ColumnDef::new(Issue::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Issue::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Issue::AssignedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Issue::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Issue::ClosedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_category")
                            .from(Issue::Table, Issue::CategoryId)
                            .to(IssueCategory::Table, IssueCategory::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_reporter")
                            .from(Issue::Table, Issue::ReporterId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_assignee")
                            .from(Issue::Table, Issue::AssigneeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (unresolved filters, analytics)
        manager
            .create_index(
                Index::create()
                    .name("idx_issue_status")
                    .table(Issue::Table)
                    .col(Issue::Status)
                    .to_owned(),
            )
            .await?;

        // Index: (hostel_id, block_id) for location filters and the heatmap
        manager
            .create_index(
                Index::create()
                    .name("idx_issue_hostel_block")
                    .table(Issue::Table)
                    .col(Issue::HostelId)
                    .col(Issue::BlockId)
                    .to_owned(),
            )
            .await?;

        // Index: category_id (category density)
        manager
            .create_index(
                Index::create()
                    .name("idx_issue_category_id")
                    .table(Issue::Table)
                    .col(Issue::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: reporter_id
        manager
            .create_index(
                Index::create()
                    .name("idx_issue_reporter_id")
                    .table(Issue::Table)
                    .col(Issue::ReporterId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (time-windowed analytics)
        manager
            .create_index(
                Index::create()
                    .name("idx_issue_created_at")
                    .table(Issue::Table)
                    .col(Issue::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Issue::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Issue {
    Table,
    Id,
    Title,
    Description,
    Priority,
    Status,
    Visibility,
    CategoryId,
    ReporterId,
    AssigneeId,
    HostelId,
    BlockId,
    RoomId,
    MediaUrl,
    ImageUrls,
    IsDuplicate,
    MergedWith,
    CreatedAt,
    UpdatedAt,
    AssignedAt,
    ResolvedAt,
    ClosedAt,
}

#[derive(Iden)]
enum IssueCategory {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
