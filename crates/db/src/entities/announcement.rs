//! Announcement entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::issue::Priority;

/// Admin broadcast, global or targeted at a hostel/block.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub priority: Priority,

    /// Pinned announcements sort before everything else.
    pub is_pinned: bool,

    pub author_id: String,

    /// Target hostel; NULL means the announcement is global.
    #[sea_orm(nullable, indexed)]
    pub target_hostel_id: Option<String>,

    #[sea_orm(nullable)]
    pub target_block_id: Option<String>,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::hostel::Entity",
        from = "Column::TargetHostelId",
        to = "super::hostel::Column::Id"
    )]
    TargetHostel,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
