//! Booking model and order identifiers

use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Choice;

/// Short human-readable booking reference, `XXXX-XXXX` in uppercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Draw 32 random bits and format them as two hex groups
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let value = rng.next_u32();
        let hex = format!("{:08X}", value);
        Self(format!("{}-{}", &hex[..4], &hex[4..]))
    }

    /// Accept only well-formed identifiers
    pub fn parse(value: &str) -> Option<Self> {
        if Self::is_well_formed(value) {
            Some(Self(value.to_string()))
        } else {
            None
        }
    }

    pub fn is_well_formed(value: &str) -> bool {
        let bytes = value.as_bytes();
        bytes.len() == 9
            && bytes[4] == b'-'
            && bytes
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != 4)
                .all(|(_, b)| b.is_ascii_digit() || (b'A'..=b'F').contains(b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl Choice for BookingStatus {
    const ALL: &'static [Self] = &[BookingStatus::Confirmed, BookingStatus::Cancelled];

    fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

/// A reservation of seats on one event by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub order_id: OrderId,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub quantity: u32,
    pub booked_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(order_id: OrderId, user_id: Uuid, event_id: Uuid, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            user_id,
            event_id,
            quantity,
            booked_at: Utc::now(),
            status: BookingStatus::Confirmed,
        }
    }
}

/// A booking with the title of the event it belongs to, for history pages
#[derive(Debug, Clone, Serialize)]
pub struct BookingRecord {
    #[serde(flatten)]
    pub booking: Booking,
    pub event_title: String,
}
