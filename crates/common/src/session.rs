//! Stateless admin session tokens.
//!
//! The admin panel is gated by a single shared password. A successful
//! login issues a signed, time-limited HS256 token carried in an
//! HTTP-only cookie. Verification is a pure function of
//! `(token, secret, clock)`; the server keeps no session table, so
//! "logout" is purely a cookie-clearing operation and a captured token
//! remains valid until natural expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppError, AppResult};

/// Claims carried by an admin session token.
///
/// The token asserts only "is an admin"; there is no user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always `true`; present so the claim set is self-describing.
    pub admin: bool,
    /// Issued-at time (seconds since epoch).
    pub iat: i64,
    /// Expiry time (seconds since epoch).
    pub exp: i64,
}

/// Issue a signed admin session token valid for `ttl_hours` from `now`.
pub fn issue_session_token(
    secret: &str,
    now: DateTime<Utc>,
    ttl_hours: i64,
) -> AppResult<String> {
    let claims = AdminClaims {
        admin: true,
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verify a session token's signature and expiry.
///
/// Any failure (bad signature, expired, malformed, wrong claims) is
/// reported as [`AppError::Unauthorized`] without further detail.
pub fn verify_session_token(token: &str, secret: &str) -> AppResult<AdminClaims> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if !data.claims.admin {
        return Err(AppError::Unauthorized);
    }

    Ok(data.claims)
}

/// Compare a supplied password against the configured secret.
///
/// Both values are hashed first so the comparison operates on
/// fixed-length digests rather than the raw password bytes.
#[must_use]
pub fn password_matches(supplied: &str, expected: &str) -> bool {
    Sha256::digest(supplied.as_bytes()) == Sha256::digest(expected.as_bytes())
}
