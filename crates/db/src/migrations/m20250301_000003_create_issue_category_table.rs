//! Create issue category table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueCategory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IssueCategory::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(IssueCategory::Name).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(IssueCategory::Icon).string_len(64))
                    .col(ColumnDef::new(IssueCategory::Specialization).string_len(16).not_null())
                    .col(ColumnDef::new(IssueCategory::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(IssueCategory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_category_is_active")
                    .table(IssueCategory::Table)
                    .col(IssueCategory::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IssueCategory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IssueCategory {
    Table,
    Id,
    Name,
    Icon,
    Specialization,
    IsActive,
    CreatedAt,
}
