//! Create upvote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Upvote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Upvote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Upvote::IssueId).string_len(32).not_null())
                    .col(ColumnDef::new(Upvote::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Upvote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upvote_issue")
                            .from(Upvote::Table, Upvote::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upvote_user")
                            .from(Upvote::Table, Upvote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (issue_id, user_id) — the only race protection for
        // the upvote toggle
        manager
            .create_index(
                Index::create()
                    .name("idx_upvote_unique")
                    .table(Upvote::Table)
                    .col(Upvote::IssueId)
                    .col(Upvote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Upvote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Upvote {
    Table,
    Id,
    IssueId,
    UserId,
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
