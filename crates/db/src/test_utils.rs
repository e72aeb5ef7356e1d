//! Shared model fixtures for repository and service tests.
//!
//! These build fully-populated models with sensible defaults so tests only
//! spell out the fields they care about.

#![allow(clippy::missing_panics_doc)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::entities::{
    comment, issue, issue_category, lost_item, lost_item_claim, upvote, user,
};

/// Fixed timestamp so fixtures are deterministic.
#[must_use]
pub fn fixed_time() -> DateTime<Utc> {
    #[allow(clippy::unwrap_used)]
    let time = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    time
}

/// A student assigned to hostel/block/room.
#[must_use]
pub fn student(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@hostel.test"),
        name: format!("Student {id}"),
        password: "password123".to_string(),
        role: user::Role::Student,
        specialization: None,
        hostel_id: Some("hostel1".to_string()),
        block_id: Some("block1".to_string()),
        room_id: Some("room101".to_string()),
        created_at: fixed_time(),
    }
}

/// A staff member with a specialization and no room assignment.
#[must_use]
pub fn staff(id: &str, specialization: user::Specialization) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@hostel.test"),
        name: format!("Staff {id}"),
        password: "password123".to_string(),
        role: user::Role::Staff,
        specialization: Some(specialization),
        hostel_id: None,
        block_id: None,
        room_id: None,
        created_at: fixed_time(),
    }
}

/// An admin.
#[must_use]
pub fn admin(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@hostel.test"),
        name: format!("Admin {id}"),
        password: "password123".to_string(),
        role: user::Role::Admin,
        specialization: None,
        hostel_id: None,
        block_id: None,
        room_id: None,
        created_at: fixed_time(),
    }
}

/// A REPORTED public issue in hostel1/block1/room101.
#[must_use]
pub fn issue(id: &str, reporter_id: &str) -> issue::Model {
    issue::Model {
        id: id.to_string(),
        title: "Broken light".to_string(),
        description: "The corridor light is flickering".to_string(),
        priority: issue::Priority::Medium,
        status: issue::IssueStatus::Reported,
        visibility: issue::Visibility::Public,
        category_id: "cat1".to_string(),
        reporter_id: reporter_id.to_string(),
        assignee_id: None,
        hostel_id: "hostel1".to_string(),
        block_id: "block1".to_string(),
        room_id: "room101".to_string(),
        media_url: None,
        image_urls: json!([]),
        is_duplicate: false,
        merged_with: None,
        created_at: fixed_time(),
        updated_at: fixed_time(),
        assigned_at: None,
        resolved_at: None,
        closed_at: None,
    }
}

/// An active electrical category.
#[must_use]
pub fn category(id: &str) -> issue_category::Model {
    issue_category::Model {
        id: id.to_string(),
        name: "Electrical".to_string(),
        icon: Some("bolt".to_string()),
        specialization: user::Specialization::Electrician,
        is_active: true,
        created_at: fixed_time(),
    }
}

/// An upvote by `user_id` on `issue_id`.
#[must_use]
pub fn upvote(id: &str, issue_id: &str, user_id: &str) -> upvote::Model {
    upvote::Model {
        id: id.to_string(),
        issue_id: issue_id.to_string(),
        user_id: user_id.to_string(),
        created_at: fixed_time(),
    }
}

/// A discussion comment.
#[must_use]
pub fn comment(id: &str, issue_id: &str, user_id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        issue_id: issue_id.to_string(),
        user_id: user_id.to_string(),
        parent_id: None,
        content: "Same problem in my room".to_string(),
        comment_type: comment::CommentType::Discussion,
        created_at: fixed_time(),
    }
}

/// A LOST item reported by `reporter_id`.
#[must_use]
pub fn lost_item(id: &str, reporter_id: &str) -> lost_item::Model {
    lost_item::Model {
        id: id.to_string(),
        title: "Black umbrella".to_string(),
        description: "Left in the common room".to_string(),
        status: lost_item::LostItemStatus::Lost,
        location: "Common room".to_string(),
        date: fixed_time(),
        image_urls: json!([]),
        reporter_id: reporter_id.to_string(),
        hostel_id: Some("hostel1".to_string()),
        created_at: fixed_time(),
    }
}

/// A PENDING claim by `claimant_id` on `lost_item_id`.
#[must_use]
pub fn claim(id: &str, lost_item_id: &str, claimant_id: &str) -> lost_item_claim::Model {
    lost_item_claim::Model {
        id: id.to_string(),
        lost_item_id: lost_item_id.to_string(),
        claimant_id: claimant_id.to_string(),
        description: "It has my initials on the handle".to_string(),
        proof_urls: json!([]),
        status: lost_item_claim::ClaimStatus::Pending,
        reviewed_at: None,
        created_at: fixed_time(),
    }
}
