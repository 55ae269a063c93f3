//! Guest-facing RSVP endpoints, scoped by token.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use banquet_common::AppResult;
use banquet_core::RsvpUpdateInput;
use banquet_db::entities::guest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Create RSVP router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{token}", get(view_rsvp).put(submit_rsvp))
}

/// The RSVP-page view of a guest. Deliberately narrower than the admin
/// payload: no token, no contact details, no audit timestamps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSnapshot {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bridal_party: bool,
    #[serde(rename = "RSVP")]
    pub rsvp: Option<bool>,
    #[serde(rename = "RSVPOthersYes")]
    pub rsvp_others_yes: Option<String>,
    #[serde(rename = "RSVPOthersNo")]
    pub rsvp_others_no: Option<String>,
    #[serde(rename = "RSVPDate")]
    pub rsvp_date: Option<DateTime<Utc>>,
    pub rsvp_viewed_at: Option<DateTime<Utc>>,
}

impl From<guest::Model> for RsvpSnapshot {
    fn from(guest: guest::Model) -> Self {
        Self {
            id: guest.id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            bridal_party: guest.bridal_party,
            rsvp: guest.rsvp,
            rsvp_others_yes: guest.rsvp_others_yes,
            rsvp_others_no: guest.rsvp_others_no,
            rsvp_date: guest.rsvp_date,
            rsvp_viewed_at: guest.rsvp_viewed_at,
        }
    }
}

/// RSVP submission request.
#[derive(Debug, Deserialize)]
pub struct SubmitRsvpRequest {
    #[serde(rename = "RSVP")]
    pub rsvp: bool,
    #[serde(rename = "RSVPOthersYes")]
    pub rsvp_others_yes: Option<String>,
    #[serde(rename = "RSVPOthersNo")]
    pub rsvp_others_no: Option<String>,
    pub notes: Option<String>,
}

/// Fetch the RSVP state behind a token, marking the first view.
async fn view_rsvp(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<RsvpSnapshot>> {
    let guest = state.rsvp_service.view(&token).await?;
    Ok(Json(RsvpSnapshot::from(guest)))
}

/// Record an RSVP submission.
async fn submit_rsvp(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<SubmitRsvpRequest>,
) -> AppResult<Json<RsvpSnapshot>> {
    let input = RsvpUpdateInput {
        rsvp: req.rsvp,
        rsvp_others_yes: req.rsvp_others_yes,
        rsvp_others_no: req.rsvp_others_no,
        notes: req.notes,
    };

    let guest = state.rsvp_service.submit(&token, input).await?;
    Ok(Json(RsvpSnapshot::from(guest)))
}
