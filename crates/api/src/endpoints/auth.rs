//! Guest site login.
//!
//! The guest-facing pages are gated by a shared password plus the
//! guest's name pair; on success the client receives display claims
//! only, no token or session.

use axum::{Json, Router, extract::State, routing::post};
use banquet_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Create guest auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Guest login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestLoginRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Display claims returned on successful guest login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestClaimsResponse {
    pub first_name: String,
    pub last_name: String,
    pub dinner: bool,
    pub bridal_party: bool,
}

/// Authenticate a guest by name pair and the shared site password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<GuestLoginRequest>,
) -> AppResult<Json<GuestClaimsResponse>> {
    let guest = state
        .guest_service
        .authenticate(&req.first_name, &req.last_name, &req.password)
        .await?;

    Ok(Json(GuestClaimsResponse {
        first_name: guest.first_name,
        last_name: guest.last_name,
        dinner: guest.dinner,
        bridal_party: guest.bridal_party,
    }))
}
