//! Lost item entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lost-and-found item status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LostItemStatus {
    /// Reported missing by its owner.
    #[sea_orm(string_value = "LOST")]
    Lost,
    /// Handed in by a finder.
    #[sea_orm(string_value = "FOUND")]
    Found,
    /// Back with its owner.
    #[sea_orm(string_value = "RETURNED")]
    Returned,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(indexed)]
    pub status: LostItemStatus,

    /// Free-text location where the item was lost or found.
    pub location: String,

    /// When the item was lost or found.
    pub date: DateTime<Utc>,

    #[sea_orm(column_type = "JsonBinary")]
    pub image_urls: Json,

    pub reporter_id: String,

    #[sea_orm(nullable)]
    pub hostel_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(has_many = "super::lost_item_claim::Entity")]
    Claims,
}

impl Related<super::lost_item_claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claims.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
