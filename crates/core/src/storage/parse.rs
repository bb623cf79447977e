//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{Choice, OrderId};

/// Storage format of naive event start times. Sorts lexically.
pub const START_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn conversion_error(message: String) -> SqlError {
    SqlError::FromSqlConversionFailure(0, Type::Text, message.into())
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Fixed-width RFC3339 so that text ordering matches time ordering
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an event start time
pub fn parse_start_at(s: &str) -> Result<NaiveDateTime, SqlError> {
    NaiveDateTime::parse_from_str(s, START_AT_FORMAT)
        .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

pub fn format_start_at(dt: &NaiveDateTime) -> String {
    dt.format(START_AT_FORMAT).to_string()
}

/// Parse a stored choice label
pub fn parse_choice<T: Choice>(s: &str) -> Result<T, SqlError> {
    T::parse(s).ok_or_else(|| conversion_error(format!("unknown value '{}'", s)))
}

/// Parse a stored order identifier
pub fn parse_order_id(s: &str) -> Result<OrderId, SqlError> {
    OrderId::parse(s).ok_or_else(|| conversion_error(format!("malformed order id '{}'", s)))
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// True when the error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &SqlError) -> bool {
    matches!(
        err,
        SqlError::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// `table.column` named by a constraint failure message
pub fn violated_column(err: &SqlError) -> Option<&str> {
    match err {
        SqlError::SqliteFailure(_, Some(msg)) => msg
            .strip_prefix("UNIQUE constraint failed: ")
            .map(|cols| cols.split(',').next().unwrap_or(cols).trim()),
        _ => None,
    }
}
