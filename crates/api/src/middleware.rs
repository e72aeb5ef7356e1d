//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use hosteldesk_common::{SessionSigner, config::SessionConfig};
use hosteldesk_core::{
    AnalyticsService, AnnouncementService, CommentService, IssueService, LostItemService,
    UpvoteService, UserService,
};
use hosteldesk_db::repositories::HostelRepository;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub issue_service: IssueService,
    pub comment_service: CommentService,
    pub upvote_service: UpvoteService,
    pub announcement_service: AnnouncementService,
    pub lost_item_service: LostItemService,
    pub analytics_service: AnalyticsService,
    pub hostel_repo: HostelRepository,
    pub signer: SessionSigner,
    pub session_config: SessionConfig,
}

/// Session authentication middleware.
///
/// Verifies the signed `session` cookie and resolves it to a user record,
/// stored in request extensions for the [`crate::extractors::AuthUser`]
/// extractors. Invalid, expired or forged cookies leave the request
/// anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && let Some(user_id) = state.signer.verify(cookie.value())
        && let Ok(Some(user)) = state.user_service.find_by_id(&user_id).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
