//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label used when the author has no usable display name
pub const FALLBACK_AUTHOR: &str = "User";

/// An append-only message on an event's discussion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(event_id: Uuid, author: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            author,
            body,
            created_at: Utc::now(),
        }
    }
}
