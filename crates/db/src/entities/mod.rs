//! Database entities.

pub mod guest;

pub use guest::Entity as Guest;
