//! HTTP API layer for banquet-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: guest-facing RSVP and login, admin guest management
//! - **Extractors**: admin session cookie validation
//! - **State**: shared service handles
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
