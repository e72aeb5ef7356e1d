//! Lost & found endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use hosteldesk_common::AppResult;
use hosteldesk_core::{ClaimSubmission, ReportItemInput, invalidation};
use hosteldesk_db::entities::{
    lost_item, lost_item::LostItemStatus, lost_item_claim, lost_item_claim::ClaimStatus,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, invalidates},
};

/// Create lost & found router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/", post(report_item))
        .route("/{id}/claims", post(submit_claim))
        .route("/{id}/found", post(mark_as_found))
}

/// Lost item response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItemResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: LostItemStatus,
    pub location: String,
    pub date: DateTime<Utc>,
    pub image_urls: serde_json::Value,
    pub reporter_id: String,
    pub hostel_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<lost_item::Model> for LostItemResponse {
    fn from(item: lost_item::Model) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            status: item.status,
            location: item.location,
            date: item.date,
            image_urls: item.image_urls,
            reporter_id: item.reporter_id,
            hostel_id: item.hostel_id,
            created_at: item.created_at,
        }
    }
}

/// Claim response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: String,
    pub lost_item_id: String,
    pub claimant_id: String,
    pub description: String,
    pub proof_urls: serde_json::Value,
    pub status: ClaimStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<lost_item_claim::Model> for ClaimResponse {
    fn from(claim: lost_item_claim::Model) -> Self {
        Self {
            id: claim.id,
            lost_item_id: claim.lost_item_id,
            claimant_id: claim.claimant_id,
            description: claim.description,
            proof_urls: claim.proof_urls,
            status: claim.status,
            reviewed_at: claim.reviewed_at,
            created_at: claim.created_at,
        }
    }
}

/// A lost item together with its claims.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LostItemWithClaimsResponse {
    #[serde(flatten)]
    pub item: LostItemResponse,
    pub claims: Vec<ClaimResponse>,
}

/// List all lost items, newest first.
async fn list_items(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LostItemResponse>>> {
    let items = state.lost_item_service.list().await?;

    Ok(ApiResponse::ok(
        items.into_iter().map(LostItemResponse::from).collect(),
    ))
}

/// Report item request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    #[validate(length(min = 1, max = 256))]
    pub location: String,

    /// LOST or FOUND.
    pub status: LostItemStatus,

    pub date: DateTime<Utc>,

    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Report a lost or found item.
async fn report_item(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ReportItemRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let input = ReportItemInput {
        title: req.title,
        description: req.description,
        location: req.location,
        status: req.status,
        date: req.date,
        image_urls: req.image_urls,
    };

    let item = state.lost_item_service.report(input, &user).await?;

    Ok(invalidates(
        invalidation::MUTATE_LOST_ITEM,
        ApiResponse::ok(LostItemResponse::from(item)),
    ))
}

/// Submit claim request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaimRequest {
    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    #[serde(default)]
    pub proof_urls: Vec<String>,
}

/// Submit a claim on a lost item.
///
/// A repeat claim by the same caller yields an error-shaped result value,
/// not a thrown error: the caller checks the response body.
async fn submit_claim(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitClaimRequest>,
) -> AppResult<Response> {
    req.validate()?;

    let submission = state
        .lost_item_service
        .submit_claim(&id, req.description, req.proof_urls, &user)
        .await?;

    match submission {
        ClaimSubmission::Submitted(claim) => {
            info!(item_id = %id, claimant_id = %user.id, "Claim submitted via API");
            Ok(invalidates(
                invalidation::MUTATE_LOST_ITEM,
                ApiResponse::ok(ClaimResponse::from(claim)),
            ))
        }
        ClaimSubmission::AlreadyClaimed => Ok(ApiResponse::<()>::err(
            "ALREADY_CLAIMED",
            "You already have a claim on this item",
        )
        .into_response()),
    }
}

/// Mark the caller's own LOST item as recovered.
async fn mark_as_found(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let item = state.lost_item_service.mark_as_found(&id, &user).await?;

    Ok(invalidates(
        invalidation::MUTATE_LOST_ITEM,
        ApiResponse::ok(LostItemResponse::from(item)),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_parses_status() {
        let req: ReportItemRequest = serde_json::from_str(
            r#"{
                "title": "Black umbrella",
                "description": "Left in the common room",
                "location": "Common room",
                "status": "FOUND",
                "date": "2025-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(req.status, LostItemStatus::Found);
        assert!(req.image_urls.is_empty());
    }

    #[test]
    fn test_item_with_claims_flattens_item() {
        let item = hosteldesk_db::test_utils::lost_item("item1", "user1");
        let claim = hosteldesk_db::test_utils::claim("claim1", "item1", "user2");

        let response = LostItemWithClaimsResponse {
            item: LostItemResponse::from(item),
            claims: vec![ClaimResponse::from(claim)],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"LOST\""));
        assert!(json.contains("\"claims\":[{"));
        assert!(json.contains("\"status\":\"PENDING\""));
    }
}
