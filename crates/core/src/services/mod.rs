//! Business services.

pub mod guest;
pub mod import;
pub mod rsvp;
pub mod session;

pub use guest::{GuestInput, GuestService};
pub use import::{ImportReport, ImportRowError, ImportService};
pub use rsvp::{RsvpService, RsvpUpdateInput};
pub use session::SessionService;
