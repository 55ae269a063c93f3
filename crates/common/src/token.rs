//! RSVP token generation.
//!
//! Every guest row carries a unique, unguessable token that grants
//! anonymous read/update access to that guest's RSVP state. Tokens are
//! 12 cryptographically random bytes, hex-encoded to 24 characters
//! (96 bits of entropy). Callers that persist tokens must still verify
//! uniqueness against the store and regenerate on collision.

use rand::RngCore;

/// Length of an encoded RSVP token in characters.
pub const RSVP_TOKEN_LEN: usize = 24;

/// Generate a fresh RSVP token.
#[must_use]
pub fn generate_rsvp_token() -> String {
    let mut bytes = [0u8; RSVP_TOKEN_LEN / 2];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns whether `value` has the shape of an RSVP token.
#[must_use]
pub fn is_rsvp_token(value: &str) -> bool {
    value.len() == RSVP_TOKEN_LEN
        && value
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
