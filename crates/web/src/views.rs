//! JSON view models returned by the GET pages

use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Json, Response};
use bracket_core::{
    BookingRecord, Category, Choice, Event, EventDetails, GameMode, Identity, Region, TeamSize,
    UserProfile,
};
use serde::Serialize;

use crate::flash::{clear_flash_cookie, read_notices, Flash};

/// A page body plus the viewer and any notices waiting for them.
///
/// Rendering consumes the notices, so the flash cookie is cleared whenever
/// one was sent.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub viewer: Option<Identity>,
    pub notices: Vec<Flash>,
    pub page: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(headers: &HeaderMap, viewer: Option<Identity>, page: T) -> Self {
        Self {
            viewer,
            notices: read_notices(headers),
            page,
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        if self.notices.is_empty() {
            Json(self).into_response()
        } else {
            let clear = clear_flash_cookie().to_string();
            (AppendHeaders([(header::SET_COOKIE, clear)]), Json(self)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub details: EventDetails,
    pub is_host: bool,
    pub can_book: bool,
    /// Echo this back to cancel or delete; only sent to the host
    pub confirmation_token: Option<String>,
}

/// Allowed values for the event form's select fields
#[derive(Debug, Serialize)]
pub struct EventChoices {
    pub categories: Vec<&'static str>,
    pub regions: Vec<&'static str>,
    pub team_sizes: Vec<&'static str>,
    pub modes: Vec<&'static str>,
}

fn labels<T: Choice>() -> Vec<&'static str> {
    T::ALL.iter().map(|c| c.as_str()).collect()
}

impl Default for EventChoices {
    fn default() -> Self {
        Self {
            categories: labels::<Category>(),
            regions: labels::<Region>(),
            team_sizes: labels::<TeamSize>(),
            modes: labels::<GameMode>(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventFormView {
    /// The event being edited; absent on create
    pub event: Option<Event>,
    pub choices: EventChoices,
}

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub bookings: Vec<BookingRecord>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct AuthFormView {
    pub heading: &'static str,
    pub next: Option<String>,
}
