//! API endpoints.

mod admin_auth;
mod auth;
mod guests;
mod import;
mod rsvp;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/rsvp", rsvp::router())
        .nest("/admin", admin_router())
}

/// Admin surface: session management plus the cookie-gated guest
/// management and import endpoints.
fn admin_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", admin_auth::router())
        .nest("/guests", guests::router())
        .merge(import::router())
}
