//! Create issue status history table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueStatusHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IssueStatusHistory::IssueId).string_len(32).not_null())
                    .col(ColumnDef::new(IssueStatusHistory::FromStatus).string_len(16).not_null())
                    .col(ColumnDef::new(IssueStatusHistory::ToStatus).string_len(16).not_null())
                    .col(
                        ColumnDef::new(IssueStatusHistory::ChangedById)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(IssueStatusHistory::Note).text())
                    .col(
                        ColumnDef::new(IssueStatusHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_status_history_issue")
                            .from(IssueStatusHistory::Table, IssueStatusHistory::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_status_history_user")
                            .from(IssueStatusHistory::Table, IssueStatusHistory::ChangedById)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_status_history_issue_id")
                    .table(IssueStatusHistory::Table)
                    .col(IssueStatusHistory::IssueId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IssueStatusHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IssueStatusHistory {
    Table,
    Id,
    IssueId,
    FromStatus,
    ToStatus,
    ChangedById,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Issue {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
