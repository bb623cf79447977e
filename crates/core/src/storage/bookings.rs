//! Booking storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    format_datetime, is_unique_violation, parse_choice, parse_datetime, parse_order_id, parse_uuid,
    OptionalExt,
};
use crate::error::Result;
use crate::models::{Booking, BookingRecord, Choice, OrderId};

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        order_id: parse_order_id(&row.get::<_, String>(1)?)?,
        user_id: parse_uuid(&row.get::<_, String>(2)?)?,
        event_id: parse_uuid(&row.get::<_, String>(3)?)?,
        quantity: row.get(4)?,
        booked_at: parse_datetime(&row.get::<_, String>(5)?)?,
        status: parse_choice(&row.get::<_, String>(6)?)?,
    })
}

pub struct BookingStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookingStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a booking. Returns false when the order id is already taken.
    #[instrument(skip(self, booking), fields(order_id = %booking.order_id, event_id = %booking.event_id))]
    pub fn create(&self, booking: &Booking) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO bookings (id, order_id, user_id, event_id, quantity, booked_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                booking.id.to_string(),
                booking.order_id.as_str(),
                booking.user_id.to_string(),
                booking.event_id.to_string(),
                booking.quantity,
                format_datetime(&booking.booked_at),
                booking.status.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Booking>> {
        let booking = self
            .conn
            .query_row(
                "SELECT id, order_id, user_id, event_id, quantity, booked_at, status
                 FROM bookings WHERE order_id = ?1",
                params![order_id.as_str()],
                booking_from_row,
            )
            .optional()?;
        Ok(booking)
    }

    /// A user's bookings with event titles, newest first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.order_id, b.user_id, b.event_id, b.quantity, b.booked_at, b.status, e.title
             FROM bookings b
             INNER JOIN events e ON e.id = b.event_id
             WHERE b.user_id = ?1
             ORDER BY b.booked_at DESC, b.rowid DESC",
        )?;

        let records = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok(BookingRecord {
                    booking: booking_from_row(row)?,
                    event_title: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count_for_event(&self, event_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE event_id = ?1",
            params![event_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
