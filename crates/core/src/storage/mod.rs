//! SQLite storage layer for Bracket

mod bookings;
mod comments;
mod events;
mod migrations;
mod parse;
mod traits;
mod users;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, BookingRecord, Comment, Event, EventStatus, OrderId, Session, User};

pub use bookings::BookingStore;
pub use comments::CommentStore;
pub use events::EventStore;
pub use migrations::latest_version;
pub use traits::{BookingRepository, CommentRepository, EventRepository, Storage, UserRepository};
pub use users::UserStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    /// Cheap round trip used by health checks
    pub fn ping(&self) -> Result<()> {
        let _: i64 = self.conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(&self.conn)
    }

    pub fn comments(&self) -> CommentStore<'_> {
        CommentStore::new(&self.conn)
    }

    pub fn bookings(&self) -> BookingStore<'_> {
        BookingStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users().find_by_username(username)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users().find_by_email(email)
    }

    fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        self.users().update_last_login(user_id)
    }

    fn create_session(&self, session: &Session) -> Result<()> {
        self.users().create_session(session)
    }

    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<Session>> {
        self.users().find_valid_session(session_id)
    }

    fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.users().delete_session(session_id)
    }

    fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.users().cleanup_expired_sessions()
    }
}

impl EventRepository for Database {
    fn create_event(&self, event: &Event) -> Result<()> {
        self.events().create(event)
    }

    fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.events().find_by_id(id)
    }

    fn update_event_details(&self, event: &Event) -> Result<()> {
        self.events().update_details(event)
    }

    fn set_event_status(&self, event_id: Uuid, status: EventStatus) -> Result<()> {
        self.events().set_status(event_id, status)
    }

    fn delete_event(&self, event_id: Uuid) -> Result<()> {
        self.events().delete(event_id)
    }

    fn list_events(&self) -> Result<Vec<Event>> {
        self.events().list_by_start()
    }

    fn list_events_for_host(&self, host_id: Uuid) -> Result<Vec<Event>> {
        self.events().list_for_host(host_id)
    }
}

impl CommentRepository for Database {
    fn create_comment(&self, comment: &Comment) -> Result<()> {
        self.comments().create(comment)
    }

    fn list_comments_for_event(&self, event_id: Uuid) -> Result<Vec<Comment>> {
        self.comments().list_for_event(event_id)
    }
}

impl BookingRepository for Database {
    fn create_booking(&self, booking: &Booking) -> Result<bool> {
        self.bookings().create(booking)
    }

    fn find_booking_by_order_id(&self, order_id: &OrderId) -> Result<Option<Booking>> {
        self.bookings().find_by_order_id(order_id)
    }

    fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>> {
        self.bookings().list_for_user(user_id)
    }

    fn count_bookings_for_event(&self, event_id: Uuid) -> Result<u64> {
        self.bookings().count_for_event(event_id)
    }
}
