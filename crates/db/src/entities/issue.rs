//! Issue entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issue lifecycle status.
///
/// REPORTED → ASSIGNED → IN_PROGRESS → RESOLVED → CLOSED. Transitions are
/// performed by direct writes; the storage layer does not enforce
/// monotonicity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum IssueStatus {
    #[sea_orm(string_value = "REPORTED")]
    Reported,
    #[sea_orm(string_value = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl IssueStatus {
    /// Statuses counted as "open" by dashboards and the unresolved filter.
    pub const ACTIVE: [Self; 3] = [Self::Reported, Self::Assigned, Self::InProgress];

    /// Whether this status is in the active set.
    #[must_use]
    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }
}

/// Issue priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Priority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "EMERGENCY")]
    Emergency,
}

/// Issue visibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Visibility {
    /// Visible to hostel-mates.
    #[sea_orm(string_value = "PUBLIC")]
    Public,
    /// Visible to the reporter, staff and admins only.
    #[sea_orm(string_value = "PRIVATE")]
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issue")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub priority: Priority,

    #[sea_orm(indexed)]
    pub status: IssueStatus,

    pub visibility: Visibility,

    #[sea_orm(indexed)]
    pub category_id: String,

    #[sea_orm(indexed)]
    pub reporter_id: String,

    /// Staff member who claimed the issue.
    #[sea_orm(nullable, indexed)]
    pub assignee_id: Option<String>,

    /// Location, denormalized from the reporter's profile (or a staff
    /// override) at creation time.
    #[sea_orm(indexed)]
    pub hostel_id: String,

    pub block_id: String,

    pub room_id: String,

    #[sea_orm(nullable)]
    pub media_url: Option<String>,

    /// Additional image URLs.
    #[sea_orm(column_type = "JsonBinary")]
    pub image_urls: Json,

    /// Duplicate-merge bookkeeping; no merge mutation exists yet.
    pub is_duplicate: bool,

    #[sea_orm(nullable)]
    pub merged_with: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub assigned_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::issue_category::Entity",
        from = "Column::CategoryId",
        to = "super::issue_category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::hostel::Entity",
        from = "Column::HostelId",
        to = "super::hostel::Column::Id"
    )]
    Hostel,
    #[sea_orm(has_many = "super::issue_status_history::Entity")]
    StatusHistory,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::upvote::Entity")]
    Upvotes,
}

impl Related<super::issue_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::issue_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::upvote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upvotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_status_set() {
        assert!(IssueStatus::Reported.is_active());
        assert!(IssueStatus::Assigned.is_active());
        assert!(IssueStatus::InProgress.is_active());
        assert!(!IssueStatus::Resolved.is_active());
        assert!(!IssueStatus::Closed.is_active());
    }
}
