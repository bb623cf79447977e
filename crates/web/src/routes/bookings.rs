//! Seat bookings and booking history

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Form;
use bracket_core::{details_path, BookingService};
use serde::Deserialize;

use super::parse_id;
use crate::error::PageError;
use crate::flash::Flash;
use crate::session::{redirect_with, RequireUser};
use crate::state::AppState;
use crate::views::{HistoryView, Page};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    /// Raw field text; parsed by the booking service
    pub quantity: String,
}

pub async fn book(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(raw_id): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Response, PageError> {
    let event_id = parse_id(&raw_id, "Event")?;

    let booking = {
        let db = state.db()?;
        BookingService::new(&*db).book(event_id, &user, &form.quantity)
    }
    .map_err(|e| PageError::new(e, details_path(event_id)))?;

    Ok(redirect_with(
        "/history",
        Flash::success(format!("Booking successful! Order ID: {}", booking.order_id)),
    ))
}

pub async fn history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    headers: HeaderMap,
) -> Result<Page<HistoryView>, PageError> {
    let bookings = {
        let db = state.db()?;
        BookingService::new(&*db).history_for(&user)
    }
    .map_err(PageError::internal)?;

    Ok(Page::new(&headers, Some(user), HistoryView { bookings }))
}
