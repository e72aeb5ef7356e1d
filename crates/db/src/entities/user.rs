//! User entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "STAFF")]
    Staff,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// Staff skill categories used to route issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Specialization {
    #[sea_orm(string_value = "IT_SUPPORT")]
    ItSupport,
    #[sea_orm(string_value = "ELECTRICIAN")]
    Electrician,
    #[sea_orm(string_value = "PLUMBER")]
    Plumber,
    #[sea_orm(string_value = "CARPENTER")]
    Carpenter,
    #[sea_orm(string_value = "CLEANER")]
    Cleaner,
    #[sea_orm(string_value = "SECURITY")]
    Security,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Display name.
    pub name: String,

    /// Stored password, compared verbatim at login.
    pub password: String,

    pub role: Role,

    /// Skill category (staff only).
    #[sea_orm(nullable)]
    pub specialization: Option<Specialization>,

    /// Assigned hostel (students; staff may be unassigned).
    #[sea_orm(nullable, indexed)]
    pub hostel_id: Option<String>,

    #[sea_orm(nullable)]
    pub block_id: Option<String>,

    #[sea_orm(nullable)]
    pub room_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Whether this user may perform staff actions.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    /// Whether this user may perform admin actions.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hostel::Entity",
        from = "Column::HostelId",
        to = "super::hostel::Column::Id"
    )]
    Hostel,
    #[sea_orm(
        belongs_to = "super::block::Entity",
        from = "Column::BlockId",
        to = "super::block::Column::Id"
    )]
    Block,
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(has_many = "super::issue::Entity")]
    Issues,
}

impl Related<super::hostel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hostel.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
