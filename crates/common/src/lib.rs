//! Common utilities and shared types for banquet-rs.
//!
//! This crate provides foundational components used across all banquet-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **RSVP tokens**: Unguessable per-guest capability tokens
//! - **Admin sessions**: Stateless signed session tokens
//!
//! # Example
//!
//! ```no_run
//! use banquet_common::{AppResult, Config, token::generate_rsvp_token};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let token = generate_rsvp_token();
//!     println!("RSVP link: {}/rsvp/{}", config.server.url, token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use session::{AdminClaims, issue_session_token, password_matches, verify_session_token};
pub use token::{RSVP_TOKEN_LEN, generate_rsvp_token, is_rsvp_token};
