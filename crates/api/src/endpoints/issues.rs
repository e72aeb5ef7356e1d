//! Issue endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use hosteldesk_common::AppResult;
use hosteldesk_core::{AddCommentInput, CreateIssueInput, IssueDetail, LocationOverride, invalidation};
use hosteldesk_db::{
    entities::{
        comment,
        comment::CommentType,
        issue,
        issue::{IssueStatus, Priority, Visibility},
        issue_status_history,
    },
    repositories::{IssueFilter, IssueSort},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, invalidates},
};

/// Create issue router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_issues))
        .route("/", post(create_issue))
        .route("/{id}", get(get_issue))
        .route("/{id}/claim", post(claim_issue))
        .route("/{id}/start", post(start_progress))
        .route("/{id}/resolve", post(resolve_issue))
        .route("/{id}/close", post(close_issue))
        .route("/{id}/upvote", post(toggle_upvote))
        .route("/{id}/comments", get(list_comments))
        .route("/{id}/comments", post(add_comment))
}

/// Issue response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: IssueStatus,
    pub visibility: Visibility,
    pub category_id: String,
    pub reporter_id: String,
    pub assignee_id: Option<String>,
    pub hostel_id: String,
    pub block_id: String,
    pub room_id: String,
    pub media_url: Option<String>,
    pub image_urls: serde_json::Value,
    pub is_duplicate: bool,
    pub merged_with: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<issue::Model> for IssueResponse {
    fn from(issue: issue::Model) -> Self {
        Self {
            id: issue.id,
            title: issue.title,
            description: issue.description,
            priority: issue.priority,
            status: issue.status,
            visibility: issue.visibility,
            category_id: issue.category_id,
            reporter_id: issue.reporter_id,
            assignee_id: issue.assignee_id,
            hostel_id: issue.hostel_id,
            block_id: issue.block_id,
            room_id: issue.room_id,
            media_url: issue.media_url,
            image_urls: issue.image_urls,
            is_duplicate: issue.is_duplicate,
            merged_with: issue.merged_with,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            assigned_at: issue.assigned_at,
            resolved_at: issue.resolved_at,
            closed_at: issue.closed_at,
        }
    }
}

/// Comment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub parent_id: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub comment_type: CommentType,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            issue_id: comment.issue_id,
            user_id: comment.user_id,
            parent_id: comment.parent_id,
            content: comment.content,
            comment_type: comment.comment_type,
            created_at: comment.created_at,
        }
    }
}

/// Status history entry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub id: String,
    pub from_status: IssueStatus,
    pub to_status: IssueStatus,
    pub changed_by_id: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<issue_status_history::Model> for HistoryResponse {
    fn from(entry: issue_status_history::Model) -> Self {
        Self {
            id: entry.id,
            from_status: entry.from_status,
            to_status: entry.to_status,
            changed_by_id: entry.changed_by_id,
            note: entry.note,
            created_at: entry.created_at,
        }
    }
}

/// Sort parameter for the issue list.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortParam {
    #[default]
    Newest,
    Oldest,
    Priority,
}

impl From<SortParam> for IssueSort {
    fn from(sort: SortParam) -> Self {
        match sort {
            SortParam::Newest => Self::Newest,
            SortParam::Oldest => Self::Oldest,
            SortParam::Priority => Self::Priority,
        }
    }
}

/// List issues query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesQuery {
    pub hostel: Option<String>,
    pub block: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    /// Restrict to the active status set.
    #[serde(default)]
    pub unresolved: bool,
    #[serde(default)]
    pub sort: SortParam,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    20
}

/// List issues response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueListResponse {
    pub issues: Vec<IssueResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// List issues with filters and pagination.
///
/// Anonymous callers see public issues only; students additionally see
/// their own private issues; staff and admins see everything.
async fn list_issues(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListIssuesQuery>,
) -> AppResult<ApiResponse<IssueListResponse>> {
    let filter = IssueFilter {
        hostel_id: query.hostel,
        block_id: query.block,
        status: query.status,
        priority: query.priority,
        search: query.search,
        unresolved_only: query.unresolved,
        sort: query.sort.into(),
        page: query.page,
        limit: query.limit.min(100),
    };

    let (issues, total) = state.issue_service.list(&filter, user.as_ref()).await?;

    Ok(ApiResponse::ok(IssueListResponse {
        issues: issues.into_iter().map(IssueResponse::from).collect(),
        total,
        page: filter.page,
        limit: filter.limit,
    }))
}

/// Create issue request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    pub category_id: String,

    pub priority: Priority,

    #[serde(default = "default_visibility")]
    pub visibility: Visibility,

    pub media_url: Option<String>,

    #[serde(default)]
    pub image_urls: Vec<String>,

    /// Staff-only explicit location override.
    pub hostel_id: Option<String>,
    pub block_id: Option<String>,
    pub room_id: Option<String>,
}

const fn default_visibility() -> Visibility {
    Visibility::Public
}

/// Create a new issue.
async fn create_issue(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateIssueRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let location_override = match (req.hostel_id, req.block_id) {
        (Some(hostel_id), Some(block_id)) => Some(LocationOverride {
            hostel_id,
            block_id,
            room_id: req.room_id,
        }),
        _ => None,
    };

    let input = CreateIssueInput {
        title: req.title,
        description: req.description,
        category_id: req.category_id,
        priority: req.priority,
        visibility: req.visibility,
        media_url: req.media_url,
        image_urls: req.image_urls,
        location_override,
    };

    let issue = state.issue_service.create(input, &user).await?;

    Ok(invalidates(
        invalidation::CREATE_ISSUE,
        ApiResponse::ok(IssueResponse::from(issue)),
    ))
}

/// Issue detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDetailResponse {
    #[serde(flatten)]
    pub issue: IssueResponse,
    pub comments: Vec<CommentResponse>,
    pub history: Vec<HistoryResponse>,
    pub upvote_count: u64,
}

impl From<IssueDetail> for IssueDetailResponse {
    fn from(detail: IssueDetail) -> Self {
        Self {
            issue: IssueResponse::from(detail.issue),
            comments: detail.comments.into_iter().map(CommentResponse::from).collect(),
            history: detail.history.into_iter().map(HistoryResponse::from).collect(),
            upvote_count: detail.upvote_count,
        }
    }
}

/// Get a single issue with its relations.
async fn get_issue(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<IssueDetailResponse>> {
    let detail = state.issue_service.detail(&id, &user).await?;

    Ok(ApiResponse::ok(IssueDetailResponse::from(detail)))
}

/// Claim an issue (staff only).
async fn claim_issue(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let issue = state.issue_service.claim(&id, &user).await?;

    Ok(invalidates(
        invalidation::TRANSITION_ISSUE,
        ApiResponse::ok(IssueResponse::from(issue)),
    ))
}

/// Start work on an issue (staff only).
async fn start_progress(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let issue = state.issue_service.start_progress(&id, &user).await?;

    Ok(invalidates(
        invalidation::TRANSITION_ISSUE,
        ApiResponse::ok(IssueResponse::from(issue)),
    ))
}

/// Resolve issue request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveIssueRequest {
    pub note: Option<String>,
}

/// Resolve an issue (staff only). The status update and the history row
/// commit atomically.
async fn resolve_issue(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    req: Option<Json<ResolveIssueRequest>>,
) -> AppResult<Response> {
    let note = req.and_then(|Json(r)| r.note);

    let issue = state.issue_service.resolve(&id, note, &user).await?;

    info!(issue_id = %id, "Issue resolved via API");

    Ok(invalidates(
        invalidation::TRANSITION_ISSUE,
        ApiResponse::ok(IssueResponse::from(issue)),
    ))
}

/// Close an issue (reporter only).
async fn close_issue(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let issue = state.issue_service.close(&id, &user).await?;

    Ok(invalidates(
        invalidation::TRANSITION_ISSUE,
        ApiResponse::ok(IssueResponse::from(issue)),
    ))
}

/// Upvote toggle response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpvoteResponse {
    pub upvoted: bool,
    pub count: u64,
}

/// Toggle the caller's upvote on an issue.
async fn toggle_upvote(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let toggle = state.upvote_service.toggle(&id, &user).await?;

    Ok(invalidates(
        invalidation::TOUCH_ISSUE,
        ApiResponse::ok(UpvoteResponse {
            upvoted: toggle.upvoted,
            count: toggle.count,
        }),
    ))
}

/// List comments on an issue (flat; the client builds the thread tree).
async fn list_comments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list(&id).await?;

    Ok(ApiResponse::ok(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

/// Add comment request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    pub parent_id: Option<String>,

    #[serde(rename = "type", default = "default_comment_type")]
    pub comment_type: CommentType,
}

const fn default_comment_type() -> CommentType {
    CommentType::Discussion
}

/// Add a comment to an issue.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let input = AddCommentInput {
        content: req.content,
        parent_id: req.parent_id,
        comment_type: req.comment_type,
    };

    let comment = state.comment_service.add(&id, input, &user).await?;

    Ok(invalidates(
        invalidation::TOUCH_ISSUE,
        ApiResponse::ok(CommentResponse::from(comment)),
    ))
}
