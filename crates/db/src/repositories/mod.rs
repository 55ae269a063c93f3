//! Database repositories.

mod guest;

pub use guest::GuestRepository;
