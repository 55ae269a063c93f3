//! CSV import endpoint.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use banquet_common::{AppError, AppResult};
use banquet_core::ImportReport;
use tracing::info;

use crate::{extractors::AdminSession, state::AppState};

/// Multipart field carrying the uploaded file.
const CSV_FIELD: &str = "csvFile";

/// Transport-level ceiling; the service enforces the configured file
/// cap with a proper error body.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create import router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/import",
        post(import_guests).layer(DefaultBodyLimit::max(BODY_LIMIT)),
    )
}

/// Import a guest-list CSV.
async fn import_guests(
    _session: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportReport>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::File(e.to_string()))?
    {
        if field.name() != Some(CSV_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::File(e.to_string()))?;

        info!(file_name = %file_name, size = bytes.len(), "Importing guest CSV");

        let report = state.import_service.import(&file_name, &bytes).await?;
        return Ok(Json(report));
    }

    Err(AppError::File(format!("missing {CSV_FIELD} field")))
}
