//! Lost item claim entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Claim review status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ClaimStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// An ownership assertion against a lost item. Unique per
/// (`lost_item_id`, `claimant_id`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_item_claim")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub lost_item_id: String,

    pub claimant_id: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Proof-of-ownership image URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub proof_urls: Json,

    pub status: ClaimStatus,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lost_item::Entity",
        from = "Column::LostItemId",
        to = "super::lost_item::Column::Id"
    )]
    LostItem,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClaimantId",
        to = "super::user::Column::Id"
    )]
    Claimant,
}

impl Related<super::lost_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
