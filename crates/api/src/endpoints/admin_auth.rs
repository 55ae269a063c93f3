//! Admin session endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use banquet_common::AppResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

/// Create admin auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(login).delete(logout).get(status))
}

/// Admin login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Session status response.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.session_service.cookie_name().to_owned(), token))
        .http_only(true)
        .secure(state.session_service.cookie_secure())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::hours(state.session_service.ttl_hours()))
        .build()
}

/// Check the admin password and set the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthStatus>)> {
    let token = state.session_service.login(&req.password)?;

    info!("Admin session opened");

    Ok((
        jar.add(session_cookie(&state, token)),
        Json(AuthStatus {
            authenticated: true,
        }),
    ))
}

/// Clear the session cookie.
///
/// Tokens are stateless and cannot be revoked server-side; an already
/// issued token stays valid until it expires.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<AuthStatus>) {
    let removal = Cookie::build((state.session_service.cookie_name().to_owned(), "")).path("/");

    (
        jar.remove(removal),
        Json(AuthStatus {
            authenticated: false,
        }),
    )
}

/// Report whether the session cookie is currently valid.
async fn status(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let authenticated = jar
        .get(state.session_service.cookie_name())
        .is_some_and(|cookie| state.session_service.verify(cookie.value()).is_ok());

    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    (status, Json(AuthStatus { authenticated }))
}
