//! API endpoints.

mod analytics;
mod announcements;
mod auth;
mod hostels;
mod issues;
mod lost_items;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/issues", issues::router())
        .nest("/announcements", announcements::router())
        .nest("/hostels", hostels::router())
        .nest("/analytics", analytics::router())
        .nest("/lost-items", lost_items::router())
        .nest("/users", users::router())
}
