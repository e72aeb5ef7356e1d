//! Hosteldesk server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use hosteldesk_api::{AppState, auth_middleware, router as api_router};
use hosteldesk_common::{Config, SessionSigner};
use hosteldesk_core::{
    AnalyticsService, AnnouncementService, CommentService, IssueService, LostItemService,
    UpvoteService, UserService,
};
use hosteldesk_db::repositories::{
    AnnouncementRepository, CommentRepository, HostelRepository, IssueCategoryRepository,
    IssueRepository, LostItemRepository, UpvoteRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
#[allow(clippy::expect_used)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hosteldesk=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting hosteldesk server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = hosteldesk_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    hosteldesk_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let hostel_repo = HostelRepository::new(Arc::clone(&db));
    let category_repo = IssueCategoryRepository::new(Arc::clone(&db));
    let issue_repo = IssueRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let upvote_repo = UpvoteRepository::new(Arc::clone(&db));
    let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
    let lost_item_repo = LostItemRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let issue_service = IssueService::new(
        issue_repo.clone(),
        category_repo.clone(),
        comment_repo.clone(),
        upvote_repo.clone(),
    );
    let comment_service = CommentService::new(comment_repo, issue_repo.clone());
    let upvote_service = UpvoteService::new(upvote_repo, issue_repo.clone());
    let announcement_service = AnnouncementService::new(announcement_repo);
    let lost_item_service = LostItemService::new(lost_item_repo);
    let analytics_service = AnalyticsService::new(
        issue_repo,
        category_repo,
        hostel_repo.clone(),
        user_repo,
    );

    let state = AppState {
        user_service,
        issue_service,
        comment_service,
        upvote_service,
        announcement_service,
        lost_item_service,
        analytics_service,
        hostel_repo,
        signer: SessionSigner::new(config.session.secret.clone()),
        session_config: config.session.clone(),
    };

    // Build the router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}
