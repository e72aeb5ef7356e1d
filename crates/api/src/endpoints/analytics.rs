//! Analytics endpoints.
//!
//! Request-time aggregates for the dashboards. Auth enforcement mirrors
//! the source system: category density needs staff/admin and the status
//! distribution needs admin, while the heatmap, the summary and the
//! lost-item views are served without a session check.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use chrono::{Duration, Utc};
use hosteldesk_common::{AppError, AppResult};
use hosteldesk_core::{
    CategoryDensity, DashboardSummary, HeatmapCell, StatusDistribution, invalidation,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    endpoints::lost_items::{ClaimResponse, LostItemResponse, LostItemWithClaimsResponse},
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, invalidates},
};

/// Create analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category_density))
        .route("/hostel-heatmap", get(hostel_heatmap))
        .route("/status-distribution", get(status_distribution))
        .route("/summary", get(summary))
        .route("/lost-items", get(lost_items))
        .route(
            "/lost-items/{item_id}/claims/{claim_id}/approve",
            post(approve_claim),
        )
}

/// Category density query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDensityQuery {
    pub hostel: Option<String>,
    /// Restrict to issues created within the last N days.
    pub days: Option<i64>,
}

/// Active issue counts per category (staff/admin).
async fn category_density(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CategoryDensityQuery>,
) -> AppResult<ApiResponse<Vec<CategoryDensity>>> {
    if !user.is_staff() && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Category analytics are for staff and admins".to_string(),
        ));
    }

    let since = query.days.map(|days| Utc::now() - Duration::days(days));

    let density = state
        .analytics_service
        .category_density(query.hostel.as_deref(), since)
        .await?;

    Ok(ApiResponse::ok(density))
}

/// Per-(hostel, block) aggregates. No session check (source behavior).
async fn hostel_heatmap(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<HeatmapCell>>> {
    let cells = state.analytics_service.heatmap().await?;

    Ok(ApiResponse::ok(cells))
}

/// Three-bucket status distribution (admin only).
async fn status_distribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatusDistribution>> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Status distribution is for admins".to_string(),
        ));
    }

    let distribution = state.analytics_service.status_distribution().await?;

    Ok(ApiResponse::ok(distribution))
}

/// Summary KPIs. No session check (source behavior).
async fn summary(State(state): State<AppState>) -> AppResult<ApiResponse<DashboardSummary>> {
    let summary = state.analytics_service.summary().await?;

    Ok(ApiResponse::ok(summary))
}

/// FOUND and RETURNED items with their claims. No session check
/// (source behavior).
async fn lost_items(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<LostItemWithClaimsResponse>>> {
    let items = state.lost_item_service.list_with_claims().await?;

    Ok(ApiResponse::ok(
        items
            .into_iter()
            .map(|(item, claims)| LostItemWithClaimsResponse {
                item: LostItemResponse::from(item),
                claims: claims.into_iter().map(ClaimResponse::from).collect(),
            })
            .collect(),
    ))
}

/// Approve a claim: claim → APPROVED and item → RETURNED in one
/// transaction. No session check (source behavior).
async fn approve_claim(
    State(state): State<AppState>,
    Path((item_id, claim_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let approved = state
        .lost_item_service
        .approve_claim(&item_id, &claim_id)
        .await?;

    info!(item_id = %item_id, claim_id = %claim_id, "Claim approved via API");

    Ok(invalidates(
        invalidation::MUTATE_LOST_ITEM,
        ApiResponse::ok(ClaimResponse::from(approved)),
    ))
}
