//! Banquet-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use banquet_api::{AppState, router as api_router};
use banquet_common::Config;
use banquet_core::{GuestService, ImportService, RsvpService, SessionService};
use banquet_db::repositories::GuestRepository;
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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banquet=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting banquet-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = banquet_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    banquet_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repository and services
    let db = Arc::new(db);
    let guest_repo = GuestRepository::new(Arc::clone(&db));

    let guest_service = GuestService::new(guest_repo.clone(), &config);
    let rsvp_service = RsvpService::new(guest_repo.clone());
    let import_service = ImportService::new(guest_repo, &config);
    let session_service = SessionService::new(&config);

    // Create app state
    let state = AppState {
        guest_service,
        rsvp_service,
        import_service,
        session_service,
    };

    // Build router
    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
