//! Hostel reference endpoints.

use axum::{Router, extract::State, routing::get};
use hosteldesk_common::AppResult;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create hostel router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_hostels))
}

/// Hostel reference entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelResponse {
    pub id: String,
    pub name: String,
}

/// List hostels as (id, name) pairs.
async fn list_hostels(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<HostelResponse>>> {
    let hostels = state.hostel_repo.find_all().await?;

    Ok(ApiResponse::ok(
        hostels
            .into_iter()
            .map(|h| HostelResponse {
                id: h.id,
                name: h.name,
            })
            .collect(),
    ))
}
