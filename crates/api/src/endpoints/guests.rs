//! Admin guest management endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use banquet_common::AppResult;
use banquet_core::{GuestInput, GuestService};
use banquet_db::entities::guest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AdminSession, state::AppState};

/// Create admin guest router. Every route requires a valid session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route("/backfill-tokens", post(backfill_tokens))
        .route(
            "/{id}",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
}

/// Full admin view of a guest, including the token and a derived RSVP
/// URL for copy actions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bridal_party: bool,
    pub nz_invite: bool,
    pub my_invite: bool,
    pub dinner: bool,
    #[serde(rename = "RSVP")]
    pub rsvp: Option<bool>,
    #[serde(rename = "RSVPOthersYes")]
    pub rsvp_others_yes: Option<String>,
    #[serde(rename = "RSVPOthersNo")]
    pub rsvp_others_no: Option<String>,
    #[serde(rename = "RSVPDate")]
    pub rsvp_date: Option<DateTime<Utc>>,
    pub rsvp_token: Option<String>,
    pub rsvp_url: Option<String>,
    pub invited_at: Option<DateTime<Utc>>,
    pub rsvp_viewed_at: Option<DateTime<Utc>>,
    pub table_number: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GuestResponse {
    fn from_model(guest: guest::Model, service: &GuestService) -> Self {
        let rsvp_url = guest
            .rsvp_token
            .as_deref()
            .map(|token| service.rsvp_url(token));

        Self {
            id: guest.id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            email: guest.email,
            phone: guest.phone,
            bridal_party: guest.bridal_party,
            nz_invite: guest.nz_invite,
            my_invite: guest.my_invite,
            dinner: guest.dinner,
            rsvp: guest.rsvp,
            rsvp_others_yes: guest.rsvp_others_yes,
            rsvp_others_no: guest.rsvp_others_no,
            rsvp_date: guest.rsvp_date,
            rsvp_token: guest.rsvp_token,
            rsvp_url,
            invited_at: guest.invited_at,
            rsvp_viewed_at: guest.rsvp_viewed_at,
            table_number: guest.table_number,
            notes: guest.notes,
            created_at: guest.created_at,
            updated_at: guest.updated_at,
        }
    }
}

/// Create/update guest request (admin form shape).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub bridal_party: bool,
    pub nz_invite: Option<bool>,
    pub my_invite: Option<bool>,
    pub table_number: Option<i32>,
    pub notes: Option<String>,
}

impl From<GuestRequest> for GuestInput {
    fn from(req: GuestRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            bridal_party: req.bridal_party,
            nz_invite: req.nz_invite,
            my_invite: req.my_invite,
            table_number: req.table_number,
            notes: req.notes,
        }
    }
}

/// Token backfill response.
#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub updated: usize,
}

/// List all guests.
async fn list_guests(
    _session: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GuestResponse>>> {
    let guests = state.guest_service.list().await?;

    let responses = guests
        .into_iter()
        .map(|guest| GuestResponse::from_model(guest, &state.guest_service))
        .collect();

    Ok(Json(responses))
}

/// Get a single guest.
async fn get_guest(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GuestResponse>> {
    let guest = state.guest_service.get(id).await?;
    Ok(Json(GuestResponse::from_model(guest, &state.guest_service)))
}

/// Create a guest.
async fn create_guest(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<GuestRequest>,
) -> AppResult<(StatusCode, Json<GuestResponse>)> {
    info!(
        first_name = %req.first_name,
        last_name = %req.last_name,
        "Creating guest"
    );

    let guest = state.guest_service.create(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(GuestResponse::from_model(guest, &state.guest_service)),
    ))
}

/// Update a guest.
async fn update_guest(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<GuestRequest>,
) -> AppResult<Json<GuestResponse>> {
    info!(guest_id = id, "Updating guest");

    let guest = state.guest_service.update(id, req.into()).await?;
    Ok(Json(GuestResponse::from_model(guest, &state.guest_service)))
}

/// Delete a guest.
async fn delete_guest(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    info!(guest_id = id, "Deleting guest");

    state.guest_service.delete(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Assign tokens to guests that are missing one.
async fn backfill_tokens(
    _session: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<BackfillResponse>> {
    let updated = state.guest_service.backfill_tokens().await?;

    info!(updated, "Backfilled RSVP tokens");

    Ok(Json(BackfillResponse { updated }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_request_defaults_optional_flags() {
        let req: GuestRequest =
            serde_json::from_str(r#"{"firstName":"An","lastName":"Nguyen"}"#).unwrap();

        assert!(!req.bridal_party);
        assert!(req.nz_invite.is_none());
        assert!(req.table_number.is_none());
    }

    #[test]
    fn test_guest_response_wire_names() {
        let response = GuestResponse {
            id: 1,
            first_name: "An".to_string(),
            last_name: "Nguyen".to_string(),
            email: None,
            phone: None,
            bridal_party: true,
            nz_invite: false,
            my_invite: false,
            dinner: false,
            rsvp: None,
            rsvp_others_yes: None,
            rsvp_others_no: None,
            rsvp_date: None,
            rsvp_token: Some("0123456789abcdef01234567".to_string()),
            rsvp_url: Some(
                "https://wedding.example.com/rsvp/0123456789abcdef01234567".to_string(),
            ),
            invited_at: None,
            rsvp_viewed_at: None,
            table_number: Some(4),
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"RSVP\":null"));
        assert!(json.contains("\"bridalParty\":true"));
        assert!(json.contains("\"rsvpUrl\":"));
        assert!(json.contains("\"tableNumber\":4"));
    }
}
