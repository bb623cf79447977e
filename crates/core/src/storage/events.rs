//! Event storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    format_datetime, format_start_at, parse_choice, parse_datetime, parse_start_at, parse_uuid,
    OptionalExt,
};
use crate::error::Result;
use crate::models::{Choice, Event, EventStatus};

const EVENT_COLUMNS: &str = "id, host_id, title, category, region, team_size, mode, prize, \
                             description, banner, start_at, status, created_at";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        host_id: parse_uuid(&row.get::<_, String>(1)?)?,
        title: row.get(2)?,
        category: parse_choice(&row.get::<_, String>(3)?)?,
        region: parse_choice(&row.get::<_, String>(4)?)?,
        team_size: parse_choice(&row.get::<_, String>(5)?)?,
        mode: parse_choice(&row.get::<_, String>(6)?)?,
        prize: row.get(7)?,
        description: row.get(8)?,
        banner: row.get(9)?,
        start_at: parse_start_at(&row.get::<_, String>(10)?)?,
        status: parse_choice(&row.get::<_, String>(11)?)?,
        created_at: parse_datetime(&row.get::<_, String>(12)?)?,
    })
}

pub struct EventStore<'a> {
    conn: &'a Connection,
}

impl<'a> EventStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new event
    #[instrument(skip(self, event), fields(event_id = %event.id, host_id = %event.host_id))]
    pub fn create(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, host_id, title, category, region, team_size, mode, prize,
                                 description, banner, start_at, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                event.id.to_string(),
                event.host_id.to_string(),
                event.title,
                event.category.as_str(),
                event.region.as_str(),
                event.team_size.as_str(),
                event.mode.as_str(),
                event.prize,
                event.description,
                event.banner,
                format_start_at(&event.start_at),
                event.status.as_str(),
                format_datetime(&event.created_at),
            ],
        )?;
        Ok(())
    }

    /// Find event by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);
        let event = self
            .conn
            .query_row(&sql, params![id.to_string()], event_from_row)
            .optional()?;
        Ok(event)
    }

    /// Overwrite the editable columns. Status and host are left alone.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub fn update_details(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "UPDATE events SET title = ?1, category = ?2, region = ?3, team_size = ?4, mode = ?5,
                               prize = ?6, description = ?7, banner = ?8, start_at = ?9
             WHERE id = ?10",
            params![
                event.title,
                event.category.as_str(),
                event.region.as_str(),
                event.team_size.as_str(),
                event.mode.as_str(),
                event.prize,
                event.description,
                event.banner,
                format_start_at(&event.start_at),
                event.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Set lifecycle status
    #[instrument(skip(self))]
    pub fn set_status(&self, event_id: Uuid, status: EventStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE events SET status = ?1 WHERE id = ?2",
            params![status.as_str(), event_id.to_string()],
        )?;
        Ok(())
    }

    /// Delete event. Comments go with it; bookings make this fail.
    #[instrument(skip(self))]
    pub fn delete(&self, event_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM events WHERE id = ?1",
            params![event_id.to_string()],
        )?;
        Ok(())
    }

    /// All events, earliest start first
    #[instrument(skip(self))]
    pub fn list_by_start(&self) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events ORDER BY start_at ASC, created_at ASC",
            EVENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map([], event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Events hosted by one user, earliest start first
    #[instrument(skip(self))]
    pub fn list_for_host(&self, host_id: Uuid) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE host_id = ?1 ORDER BY start_at ASC, created_at ASC",
            EVENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![host_id.to_string()], event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }
}
