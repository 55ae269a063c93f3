//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use banquet_common::{AdminClaims, AppError};

use crate::state::AppState;

/// Valid admin session extractor.
///
/// Reads the session cookie and verifies its signature and expiry.
/// Rejects with 401 when the cookie is absent, tampered, or expired.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar
            .get(state.session_service.cookie_name())
            .ok_or(AppError::Unauthorized)?;

        let claims = state.session_service.verify(cookie.value())?;
        Ok(Self(claims))
    }
}
