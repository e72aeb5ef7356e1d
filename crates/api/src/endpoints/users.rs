//! User reference endpoints.

use axum::{Router, extract::State, routing::get};
use hosteldesk_common::AppResult;
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create user router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_users))
}

/// User reference entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReferenceResponse {
    pub id: String,
    pub name: String,
}

/// List users as (id, name) pairs.
///
/// No session requirement, matching the source system's surface.
async fn list_users(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<UserReferenceResponse>>> {
    let users = state.user_service.reference_list().await?;

    Ok(ApiResponse::ok(
        users
            .into_iter()
            .map(|(id, name)| UserReferenceResponse { id, name })
            .collect(),
    ))
}
