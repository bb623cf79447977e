//! Storage repository traits
//!
//! These traits define the storage interface the services are written
//! against, so a service never names the SQLite types directly.

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, BookingRecord, Comment, Event, EventStatus, OrderId, Session, User};

/// User and session operations
pub trait UserRepository {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by ID
    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find user by username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by email
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Update user's last login time
    fn update_last_login(&self, user_id: Uuid) -> Result<()>;

    /// Create a session
    fn create_session(&self, session: &Session) -> Result<()>;

    /// Find a valid (non-expired) session
    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<Session>>;

    /// Delete a session
    fn delete_session(&self, session_id: Uuid) -> Result<()>;

    /// Clean up expired sessions
    fn cleanup_expired_sessions(&self) -> Result<u64>;
}

/// Event operations
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> Result<()>;

    fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    /// Write the editable fields of an event
    fn update_event_details(&self, event: &Event) -> Result<()>;

    fn set_event_status(&self, event_id: Uuid, status: EventStatus) -> Result<()>;

    fn delete_event(&self, event_id: Uuid) -> Result<()>;

    /// All events, earliest start first
    fn list_events(&self) -> Result<Vec<Event>>;

    /// Events hosted by a user, earliest start first
    fn list_events_for_host(&self, host_id: Uuid) -> Result<Vec<Event>>;
}

/// Comment operations
pub trait CommentRepository {
    fn create_comment(&self, comment: &Comment) -> Result<()>;

    /// Comments on an event, newest first
    fn list_comments_for_event(&self, event_id: Uuid) -> Result<Vec<Comment>>;
}

/// Booking operations
pub trait BookingRepository {
    /// Insert a booking; false when its order id is already taken
    fn create_booking(&self, booking: &Booking) -> Result<bool>;

    fn find_booking_by_order_id(&self, order_id: &OrderId) -> Result<Option<Booking>>;

    /// A user's bookings, newest first
    fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>>;

    fn count_bookings_for_event(&self, event_id: Uuid) -> Result<u64>;
}

/// Combined storage interface
pub trait Storage: UserRepository + EventRepository + CommentRepository + BookingRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: UserRepository + EventRepository + CommentRepository + BookingRepository
{
}
