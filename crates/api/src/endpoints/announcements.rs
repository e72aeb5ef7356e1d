//! Announcement endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use hosteldesk_common::AppResult;
use hosteldesk_core::{CreateAnnouncementInput, invalidation};
use hosteldesk_db::entities::{announcement, issue::Priority};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, invalidates},
};

/// Create announcement router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements))
        .route("/", post(create_announcement))
}

/// Announcement response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub is_pinned: bool,
    pub author_id: String,
    pub target_hostel_id: Option<String>,
    pub target_block_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(announcement: announcement::Model) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            content: announcement.content,
            priority: announcement.priority,
            is_pinned: announcement.is_pinned,
            author_id: announcement.author_id,
            target_hostel_id: announcement.target_hostel_id,
            target_block_id: announcement.target_block_id,
            expires_at: announcement.expires_at,
            created_at: announcement.created_at,
        }
    }
}

/// List announcements visible to the caller: global ones plus those
/// targeting the caller's hostel, pinned first.
async fn list_announcements(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AnnouncementResponse>>> {
    let announcements = state.announcement_service.list_for(&user).await?;

    Ok(ApiResponse::ok(
        announcements
            .into_iter()
            .map(AnnouncementResponse::from)
            .collect(),
    ))
}

/// Create announcement request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 10_000))]
    pub content: String,

    pub priority: Priority,

    #[serde(default)]
    pub is_pinned: bool,

    /// Omit to broadcast to every hostel.
    pub target_hostel_id: Option<String>,
    pub target_block_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create an announcement (admin only).
async fn create_announcement(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateAnnouncementRequest>,
) -> AppResult<Response> {
    req.validate()?;

    info!(user_id = %user.id, title = %req.title, "Creating announcement");

    let input = CreateAnnouncementInput {
        title: req.title,
        content: req.content,
        priority: req.priority,
        is_pinned: req.is_pinned,
        target_hostel_id: req.target_hostel_id,
        target_block_id: req.target_block_id,
        expires_at: req.expires_at,
    };

    let announcement = state.announcement_service.create(input, &user).await?;

    Ok(invalidates(
        invalidation::CREATE_ANNOUNCEMENT,
        ApiResponse::ok(AnnouncementResponse::from(announcement)),
    ))
}
