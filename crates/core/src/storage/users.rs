//! User and session storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    format_datetime, is_unique_violation, parse_datetime, parse_datetime_opt, parse_uuid,
    violated_column, OptionalExt,
};
use crate::error::{Error, Result};
use crate::models::{Session, User};
use crate::validation::{EMAIL_TAKEN, USERNAME_TAKEN};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, last_login";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
        last_login: parse_datetime_opt(row.get::<_, Option<String>>(5)?)?,
    })
}

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new user. A taken username or email is a validation error.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub fn create(&self, user: &User) -> Result<()> {
        let inserted = self.conn.execute(
            "INSERT INTO users (id, username, email, password_hash, created_at, last_login)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.password_hash,
                format_datetime(&user.created_at),
                user.last_login.as_ref().map(format_datetime),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => match violated_column(&e) {
                Some("users.email") => Err(Error::invalid("email", EMAIL_TAKEN)),
                _ => Err(Error::invalid("username", USERNAME_TAKEN)),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Find user by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![id.to_string()], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Find user by username
    #[instrument(skip(self))]
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![username], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Find user by email address
    #[instrument(skip(self))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![email], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Update last login time
    pub fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), user_id.to_string()],
        )?;
        Ok(())
    }

    /// Create a session
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub fn create_session(&self, session: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                format_datetime(&session.created_at),
                format_datetime(&session.expires_at),
            ],
        )?;
        Ok(())
    }

    /// Find a session that has not expired yet
    #[instrument(skip(self))]
    pub fn find_valid_session(&self, session_id: Uuid) -> Result<Option<Session>> {
        let session = self
            .conn
            .query_row(
                "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?1 AND expires_at > ?2",
                params![session_id.to_string(), format_datetime(&Utc::now())],
                |row| {
                    Ok(Session {
                        id: parse_uuid(&row.get::<_, String>(0)?)?,
                        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
                        created_at: parse_datetime(&row.get::<_, String>(2)?)?,
                        expires_at: parse_datetime(&row.get::<_, String>(3)?)?,
                    })
                },
            )
            .optional()?;

        Ok(session)
    }

    /// Delete session. Deleting an unknown session is not an error.
    pub fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sessions WHERE id = ?1",
            params![session_id.to_string()],
        )?;
        Ok(())
    }

    /// Clean up expired sessions
    pub fn cleanup_expired_sessions(&self) -> Result<u64> {
        let count = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![format_datetime(&Utc::now())],
        )?;
        Ok(count as u64)
    }
}
