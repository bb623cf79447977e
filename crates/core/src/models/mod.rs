//! Data models for Bracket

mod booking;
mod comment;
mod event;
mod user;

pub use booking::*;
pub use comment::*;
pub use event::*;
pub use user::*;

use serde::Serialize;

/// Everything shown on an event's details page
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub event: Event,
    pub host: Option<PublicUser>,
    pub comments: Vec<Comment>,
}

/// A public profile: the user and the events they host
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user: PublicUser,
    pub hosted: Vec<Event>,
}
