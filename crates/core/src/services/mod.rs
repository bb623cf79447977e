//! Domain services
//!
//! Each service borrows the storage for the length of one call and receives
//! the acting identity explicitly.

mod auth;
mod bookings;
mod comments;
mod events;

pub use auth::{hash_password, verify_password, AuthService, SignedIn, DEFAULT_SESSION_HOURS};
pub use bookings::{BookingService, ORDER_ID_ATTEMPTS};
pub use comments::CommentService;
pub use events::{Confirmation, EventService};
