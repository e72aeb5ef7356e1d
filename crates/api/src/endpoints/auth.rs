//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hosteldesk_common::AppResult;
use hosteldesk_db::entities::user;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::{AppState, SESSION_COOKIE},
    response::ApiResponse,
};

/// Create authentication router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Authenticated user profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: user::Role,
    pub specialization: Option<user::Specialization>,
    pub hostel_id: Option<String>,
    pub block_id: Option<String>,
    pub room_id: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            specialization: user.specialization,
            hostel_id: user.hostel_id,
            block_id: user.block_id,
            room_id: user.room_id,
        }
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Sign in and receive the signed session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<UserResponse>)> {
    req.validate()?;

    let user = state.user_service.authenticate(&req.email, &req.password).await?;

    info!(user_id = %user.id, "User signed in");

    let token = state
        .signer
        .issue(&user.id, state.session_config.max_age_days);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::days(state.session_config.max_age_days))
        .secure(state.session_config.secure_cookies)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), ApiResponse::ok(UserResponse::from(user))))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out by clearing the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<LogoutResponse>) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");

    (jar.remove(cookie), ApiResponse::ok(LogoutResponse { ok: true }))
}

/// The current principal's profile.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(UserResponse::from(user))
}
