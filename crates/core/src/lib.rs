//! Core business logic for banquet-rs.

pub mod services;

pub use services::*;
