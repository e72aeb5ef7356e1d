//! HTTP API layer for hosteldesk.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: issues, announcements, lost & found, analytics,
//!   reference lists
//! - **Extractors**: the authenticated principal resolved by the session
//!   middleware
//! - **Middleware**: session-cookie authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, SESSION_COOKIE, auth_middleware};
