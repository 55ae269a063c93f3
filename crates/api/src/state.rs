//! Shared application state.

use banquet_core::{GuestService, ImportService, RsvpService, SessionService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub guest_service: GuestService,
    pub rsvp_service: RsvpService,
    pub import_service: ImportService,
    pub session_service: SessionService,
}
