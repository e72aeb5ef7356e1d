//! Create lost item and lost item claim tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LostItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LostItem::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LostItem::Title).string_len(256).not_null())
                    .col(ColumnDef::new(LostItem::Description).text().not_null())
                    .col(ColumnDef::new(LostItem::Status).string_len(16).not_null())
                    .col(ColumnDef::new(LostItem::Location).string_len(256).not_null())
                    .col(ColumnDef::new(LostItem::Date).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LostItem::ImageUrls).json_binary().not_null())
                    .col(ColumnDef::new(LostItem::ReporterId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItem::HostelId).string_len(32))
                    .col(
                        ColumnDef::new(LostItem::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_reporter")
                            .from(LostItem::Table, LostItem::ReporterId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (found/returned dashboards)
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_item_status")
                    .table(LostItem::Table)
                    .col(LostItem::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LostItemClaim::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LostItemClaim::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(LostItemClaim::LostItemId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItemClaim::ClaimantId).string_len(32).not_null())
                    .col(ColumnDef::new(LostItemClaim::Description).text().not_null())
                    .col(ColumnDef::new(LostItemClaim::ProofUrls).json_binary().not_null())
                    .col(ColumnDef::new(LostItemClaim::Status).string_len(16).not_null())
                    .col(ColumnDef::new(LostItemClaim::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(LostItemClaim::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_claim_item")
                            .from(LostItemClaim::Table, LostItemClaim::LostItemId)
                            .to(LostItem::Table, LostItem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_item_claim_claimant")
                            .from(LostItemClaim::Table, LostItemClaim::ClaimantId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (lost_item_id, claimant_id) — closes the duplicate
        // claim race under concurrency; the application pre-check still
        // handles the sequential case
        manager
            .create_index(
                Index::create()
                    .name("idx_lost_item_claim_unique")
                    .table(LostItemClaim::Table)
                    .col(LostItemClaim::LostItemId)
                    .col(LostItemClaim::ClaimantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LostItemClaim::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LostItem::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LostItem {
    Table,
    Id,
    Title,
    Description,
    Status,
    Location,
    Date,
    ImageUrls,
    ReporterId,
    HostelId,
    CreatedAt,
}

#[derive(Iden)]
enum LostItemClaim {
    Table,
    Id,
    LostItemId,
    ClaimantId,
    Description,
    ProofUrls,
    Status,
    ReviewedAt,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
