//! Comment storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{format_datetime, parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::Comment;

pub struct CommentStore<'a> {
    conn: &'a Connection,
}

impl<'a> CommentStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a comment
    #[instrument(skip(self, comment), fields(event_id = %comment.event_id))]
    pub fn create(&self, comment: &Comment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO comments (id, event_id, author, body, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id.to_string(),
                comment.event_id.to_string(),
                comment.author,
                comment.body,
                format_datetime(&comment.created_at),
            ],
        )?;
        Ok(())
    }

    /// Comments on an event, newest first
    #[instrument(skip(self))]
    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, author, body, created_at FROM comments
             WHERE event_id = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let comments = stmt
            .query_map(params![event_id.to_string()], |row| {
                Ok(Comment {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    event_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    author: row.get(2)?,
                    body: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(comments)
    }
}
